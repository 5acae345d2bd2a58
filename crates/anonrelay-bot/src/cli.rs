//! Command-line interface definitions and parsing

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about = "Anonymous one-on-one chat relay bot", long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the state snapshot file path
    #[arg(short, long)]
    pub state_file: Option<String>,

    /// Print an example configuration file and exit
    #[arg(long)]
    pub example_config: bool,
}
