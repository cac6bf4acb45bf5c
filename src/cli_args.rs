use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::common::TimeWindow;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineArgs {
    #[arg(
        short,
        long,
        help = "Subreddit to list (a preset such as 'popular' or any custom name)"
    )]
    pub community: Option<String>,

    #[arg(short, long = "time", value_enum, help = "Ranking period for top posts")]
    pub time_window: Option<TimeWindow>,

    #[arg(short, long, help = "Only show posts whose title contains this text")]
    pub search: Option<String>,

    #[arg(short, long, help = "Keep the panel open and accept commands")]
    pub interactive: bool,

    #[arg(long, help = "Path to a settings.json with initial preferences")]
    pub settings: Option<PathBuf>,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let args = CommandLineArgs::parse();

        info!(
            "Parsed arguments: community={:?}, time={:?}, interactive={}",
            args.community, args.time_window, args.interactive
        );

        args
    }
}
