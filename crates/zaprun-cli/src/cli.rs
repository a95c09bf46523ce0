use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use zaprun_core::ScanConfig;

/// Drive a ZAP daemon spider and collect its alerts
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Turn debugging information on (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Spider the target, wait for completion and write its alerts to a file
    Scan(ScanArgs),

    /// Import report files into DefectDojo
    Upload {
        /// Report files; the scan type is picked from each file name
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Print the effective configuration (API keys redacted)
    Config,
}

#[derive(Debug, Default, Args)]
pub struct ScanArgs {
    /// URL to spider
    #[arg(short, long)]
    pub target: Option<String>,

    /// File to write the alerts to
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Seconds between status polls
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Give up after this many status polls
    #[arg(long, value_name = "N")]
    pub max_polls: Option<u32>,

    /// Give up after polling for this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl ScanArgs {
    /// Overlay the flags that were given onto the `[scan]` section.
    pub fn apply(&self, config: &mut ScanConfig) {
        if let Some(target) = &self.target {
            config.target.clone_from(target);
        }
        if let Some(output) = &self.output {
            config.output_path.clone_from(output);
        }
        if let Some(interval) = self.interval {
            config.poll_interval_secs = interval;
        }
        if self.max_polls.is_some() {
            config.max_polls = self.max_polls;
        }
        if self.timeout.is_some() {
            config.timeout_secs = self.timeout;
        }
    }
}
