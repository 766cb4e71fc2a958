//! Binary crate for the `worldclock` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive API key entry
//! - Drawing the dashboard to the terminal

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use worldclock_core::Config;

mod cli;
mod prompt;
mod terminal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    let config = Config::load()?;

    init_tracing(&config, cmd.verbose);

    cmd.run(config).await
}

/// Logs go to stderr so they never interleave with the dashboard on stdout.
fn init_tracing(config: &Config, verbose: u8) {
    let fallback = match verbose {
        0 => config.log_filter.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
