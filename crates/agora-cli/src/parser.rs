//! Root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,agora=debug";

/// Backend for the Agora plant bounty platform.
#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Run and maintain the Agora plant bounty backend")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub const fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { DEFAULT_LOG_FILTER }
    }
}
