//! Command-line surface of `ohl-lookup`: argument parsing and one run.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;

use crate::config::{DEFAULT_CONFIG_PATH, LookupConfig};
use crate::lookup::LookupService;
use crate::output;

/// Show the latest openHAB log event for an item, thing or free-text term.
///
/// Exit status: 0 found, 1 not found, 2 failed.
#[derive(Parser, Debug)]
#[command(name = "ohl-lookup", version, about)]
pub struct Cli {
    /// Item name, thing UID, `key=value` pair or any text (2-100 chars).
    /// Put `--` before a term that starts with a dash.
    #[arg(value_name = "TERM")]
    pub term: String,

    /// Path to the TOML config (missing file means defaults).
    #[arg(value_name = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Print the event as JSON (`null` when nothing was found).
    #[arg(short = 'j', long = "json")]
    pub json: bool,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    NotFound,
    Failed,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Self::Found => 0,
            Self::NotFound => 1,
            Self::Failed => 2,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        ExitCode::from(outcome.code())
    }
}

/// Execute one lookup and write the result to `out`.
///
/// Every failure, from config loading to output, ends as `Outcome::Failed`
/// so callers can tell it apart from "not found".
pub async fn run(cli: &Cli, out: &mut impl Write) -> Outcome {
    match execute(cli, out).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(term = %cli.term, error = %e, "lookup failed");
            eprintln!("ohl-lookup: {e:#}");
            Outcome::Failed
        }
    }
}

async fn execute(cli: &Cli, out: &mut impl Write) -> anyhow::Result<Outcome> {
    let config = LookupConfig::load_or_default(&cli.config)?;
    tracing::debug!(
        events_log = %config.query.events_log,
        backend = ?config.backend,
        "config loaded"
    );

    let service = LookupService::from_config(&config)?;
    if service.directory().is_some() && !service.refresh_directory().await {
        tracing::warn!("item directory unavailable, searching as free text");
    }

    let result = service.lookup(&cli.term).await?;

    if cli.json {
        writeln!(out, "{}", output::render_json(result.as_ref())?)?;
    } else {
        let now = chrono::Local::now().naive_local();
        writeln!(out, "{}", output::render_text(&cli.term, result.as_ref(), now))?;
    }

    Ok(if result.is_some() {
        Outcome::Found
    } else {
        Outcome::NotFound
    })
}
