//! Latest-occurrence search across the openHAB event and application logs.
//!
//! A query looks up the last line containing the term in each configured
//! log, classifies what it finds, keeps the most recent candidate and
//! augments it with any `key=value` structure the term or line carries.

use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::augment::augment;
use crate::error::{LogError, LogResult};
use crate::parsers::classify;
use crate::source::LogSource;
use crate::types::LogEvent;

/// Shortest accepted search term, in characters.
pub const MIN_TERM_CHARS: usize = 2;

/// Longest accepted search term, in characters.
pub const MAX_TERM_CHARS: usize = 100;

/// Minimum alphanumeric characters a secondary-log needle must contain.
pub const MIN_SECONDARY_ALNUM: usize = 2;

// ── Config ────────────────────────────────────────────────────

/// Which logs to search and how long each lookup may take.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Primary log of item/thing events.
    #[serde(default = "default_events_log")]
    pub events_log: String,
    /// Secondary application log. Empty string disables it.
    #[serde(default = "default_app_log")]
    pub app_log: Option<String>,
    /// Per-lookup timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_events_log() -> String {
    "/var/log/openhab/events.log".into()
}
fn default_app_log() -> Option<String> {
    Some("/var/log/openhab/openhab.log".into())
}
fn default_timeout_secs() -> u64 {
    3
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            events_log: default_events_log(),
            app_log: default_app_log(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl QueryConfig {
    /// The secondary log path, if one is configured.
    pub fn secondary_path(&self) -> Option<&str> {
        self.app_log.as_deref().filter(|p| !p.trim().is_empty())
    }
}

// ── Strategy ──────────────────────────────────────────────────

/// How the term is turned into per-log needles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStrategy {
    /// Search both logs for the bare term.
    FreeText,
    /// The term names a known item or thing: search the events log for the
    /// quoted name so `Light` does not hit `Light_2`.
    Entity,
}

impl SearchStrategy {
    /// Pick a strategy given the names the entity directory currently knows.
    pub fn choose(term: &str, known_names: &HashSet<String>) -> Self {
        if known_names.contains(term) {
            Self::Entity
        } else {
            Self::FreeText
        }
    }

    pub fn primary_needle(&self, term: &str) -> String {
        match self {
            Self::FreeText => term.to_string(),
            Self::Entity => format!("'{term}'"),
        }
    }

    pub fn secondary_needle(&self, term: &str) -> String {
        term.to_string()
    }
}

// ── Engine ────────────────────────────────────────────────────

/// Stateless query engine; safe to share across concurrent queries.
pub struct LogQueryEngine {
    source: Arc<dyn LogSource>,
    config: QueryConfig,
    timeout: Duration,
}

impl LogQueryEngine {
    pub fn new(source: Arc<dyn LogSource>, config: QueryConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        Self {
            source,
            config,
            timeout,
        }
    }

    /// Override the per-lookup timeout with sub-second precision.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Find the latest event mentioning `term`, searching as free text.
    ///
    /// `Ok(None)` covers both "no match" and a rejected term; `Err` means a
    /// source failed in a way that is not a soft failure.
    pub async fn search_log(&self, term: &str) -> LogResult<Option<LogEvent>> {
        self.search_log_with(term, SearchStrategy::FreeText).await
    }

    /// Find the latest event mentioning `term` using `strategy`.
    pub async fn search_log_with(
        &self,
        term: &str,
        strategy: SearchStrategy,
    ) -> LogResult<Option<LogEvent>> {
        if !is_valid_term(term) {
            tracing::debug!(len = term.chars().count(), "search term rejected");
            return Ok(None);
        }

        let primary_needle = strategy.primary_needle(term);
        let secondary_needle = strategy.secondary_needle(term);

        let primary = self.lookup(&self.config.events_log, &primary_needle);
        let secondary = async {
            match self.config.secondary_path() {
                Some(path) if has_enough_alnum(&secondary_needle) => {
                    self.lookup(path, &secondary_needle).await
                }
                Some(_) => {
                    tracing::debug!(needle = %secondary_needle, "secondary needle too broad, skipped");
                    Ok(None)
                }
                None => Ok(None),
            }
        };

        let (primary, secondary) = tokio::join!(primary, secondary);
        let best = merge_latest(primary?, secondary?);

        match &best {
            Some(event) => tracing::debug!(
                term = %term,
                kind = %event.kind,
                timestamp = %event.timestamp,
                "latest occurrence found"
            ),
            None => tracing::debug!(term = %term, "no occurrence found"),
        }

        Ok(best.map(|event| augment(term, event)))
    }

    /// One source lookup, with soft failures folded into "no candidate".
    async fn lookup(&self, path: &str, needle: &str) -> LogResult<Option<LogEvent>> {
        let outcome =
            match tokio::time::timeout(self.timeout, self.source.find_last_match(path, needle)).await
            {
                Ok(result) => result,
                Err(_) => Err(LogError::Timeout {
                    path: path.to_string(),
                    after: self.timeout,
                }),
            };

        match outcome {
            Ok(Some(line)) => Ok(classify(&line)),
            Ok(None) => Ok(None),
            Err(e) if e.is_soft() => {
                tracing::warn!(path = %path, error = %e, "log source skipped");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Term length must lie in `[MIN_TERM_CHARS, MAX_TERM_CHARS]`.
pub fn is_valid_term(term: &str) -> bool {
    (MIN_TERM_CHARS..=MAX_TERM_CHARS).contains(&term.chars().count())
}

fn has_enough_alnum(needle: &str) -> bool {
    needle.chars().filter(|c| c.is_alphanumeric()).count() >= MIN_SECONDARY_ALNUM
}

/// Keep whichever event has the later timestamp.
///
/// Empty timestamps sort lowest; on a tie the current best stays.
pub fn merge_latest(best: Option<LogEvent>, candidate: Option<LogEvent>) -> Option<LogEvent> {
    match (best, candidate) {
        (Some(best), Some(candidate)) => {
            if candidate.timestamp > best.timestamp {
                Some(candidate)
            } else {
                Some(best)
            }
        }
        (best, candidate) => best.or(candidate),
    }
}
