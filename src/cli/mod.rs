// CLI module
// Command-line interface, argument parsing and log setup

mod args;

pub use args::{AccountKind, CardArgs, CliArgs, Command, EventSlot};

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, a missing required argument, or
/// --help), clap displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (from `--log-level`)
/// is used. Calling this twice keeps the first subscriber.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
