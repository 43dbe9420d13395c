//! Log lookup error types.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while searching a log source.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("source not found: {0}")]
    NotFound(String),

    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("search of {path} timed out after {after:?}")]
    Timeout { path: String, after: Duration },

    #[error("{0}")]
    Other(String),
}

impl LogError {
    /// Whether this failure only removes one source's candidate from a query.
    ///
    /// A missing file, a missing/failing search tool and a timeout are soft.
    /// Anything else fails the whole query.
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::SearchUnavailable(_) | Self::Timeout { .. }
        )
    }
}

/// Convenience alias for log lookup results.
pub type LogResult<T> = Result<T, LogError>;
