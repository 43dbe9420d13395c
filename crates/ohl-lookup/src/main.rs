//! ohl-lookup — show the latest openHAB log event for an item, thing or term.
//!
//! Usage: `ohl-lookup [--json] <term> [config.toml]`
//!
//! Exit status: 0 found, 1 not found, 2 failed (including usage errors).

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ohl_lookup::cli::{self, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let outcome = cli::run(&args, &mut std::io::stdout()).await;
    outcome.into()
}
