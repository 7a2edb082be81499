use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Check whether Python packages support Python 3
#[derive(Parser, Debug)]
#[command(name = "py3ready")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of concurrent registry lookups
    #[arg(short, long, default_value_t = 8, global = true)]
    pub jobs: usize,

    /// Registry base URL (overrides the config file)
    #[arg(long, global = true)]
    pub registry: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check projects for Python 3 support
    Check {
        /// Project names or requirement specifiers (e.g. `requests>=2.0`)
        projects: Vec<String>,

        /// Read specifiers from a requirements file (repeatable)
        #[arg(short, long = "requirement", value_name = "FILE")]
        requirements: Vec<PathBuf>,
    },
    /// List projects known to support Python 3 regardless of metadata
    Overrides,
}
