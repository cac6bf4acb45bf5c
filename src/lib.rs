pub mod actions;
pub mod app;
pub mod cli_args;
pub mod common;
pub mod filters;
pub mod formatting;
pub mod panel;
pub mod settings;
pub mod trend_fetcher;

pub use common::{CommunityChoice, Post, TimeWindow};
pub use panel::{PanelEvent, PanelState};
pub use trend_fetcher::{FetchError, PostSource, TrendFetcher};
