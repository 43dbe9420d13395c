//! Core log lookup types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of the leading timestamp on every openHAB log line.
///
/// Fixed width, so lexicographic order equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

// ── Event Kind ────────────────────────────────────────────────

/// What a classified log line reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// `Item 'x' changed from a to b`, directly or through a group.
    StateChanged,
    /// `Item 'x' received command c`.
    CommandReceived,
    /// `Thing 'x' changed from a to b`.
    ThingStatusChanged,
    /// The line mentions the term but has no recognised structure.
    Unclassified,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateChanged => "state_changed",
            Self::CommandReceived => "command_received",
            Self::ThingStatusChanged => "thing_status_changed",
            Self::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Log Event ─────────────────────────────────────────────────

/// One log line, classified.
///
/// Built once per source per query and never shared. `value`, when present,
/// is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// `YYYY-MM-DD HH:MM:SS.mmm`, or empty if the line had none.
    pub timestamp: String,
    /// Item or thing name the event concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Resulting state, command or status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub kind: EventKind,
    /// Exact source line.
    pub raw_line: String,
    /// Set when `value` came from a `term=value` pair inside `raw_line`.
    #[serde(default)]
    pub value_from_inline_kv: bool,
}

impl LogEvent {
    /// An event carrying nothing but the line it came from.
    pub fn unclassified(timestamp: impl Into<String>, raw_line: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            subject: None,
            value: None,
            kind: EventKind::Unclassified,
            raw_line: raw_line.into(),
            value_from_inline_kv: false,
        }
    }

    /// Parse `timestamp` into a calendar time. `None` when absent.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        if self.timestamp.is_empty() {
            return None;
        }
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}
