pub mod constants;
pub mod types;

pub use types::{CommunityChoice, Post, TimeWindow};
