use anyhow::{Context, Result};
use log::{debug, info};
use std::process::ExitCode;
use std::sync::Arc;

use reddit_trends::actions::SystemActionHost;
use reddit_trends::app::App;
use reddit_trends::cli_args::CommandLineArgs;
use reddit_trends::settings::Settings;
use reddit_trends::{PanelState, TrendFetcher};

fn main() -> Result<ExitCode> {
    let cli_args = CommandLineArgs::parse_args();

    let level = if cli_args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    info!(
        "Reddit Trends v{} starting up...",
        env!("CARGO_PKG_VERSION")
    );

    debug!("Loading settings...");
    let settings = Settings::resolve(cli_args.settings.as_deref())?;
    let community = cli_args
        .community
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| settings.community.clone());
    let time_window = cli_args.time_window.unwrap_or(settings.time_window);
    debug!("Initial query: r/{} ({})", community, time_window);

    let fetcher =
        TrendFetcher::new(settings.fetcher_config()).context("Failed to create HTTP client")?;
    let panel = PanelState::new(&community, time_window);
    let mut app = App::new(
        panel,
        Arc::new(fetcher),
        Box::new(SystemActionHost),
        &settings.site_base_url,
    );

    if cli_args.interactive {
        app.run_interactive()?;
        return Ok(ExitCode::SUCCESS);
    }

    if app.run_once(cli_args.search.clone())? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
