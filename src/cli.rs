use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "minish", version, about = "A minimal interactive Unix shell")]
pub struct Cli {
    /// Evaluate a single command line, then exit with its status
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub command: Option<String>,

    /// Use an alternate configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
