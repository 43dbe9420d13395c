//! Key-value augmentation of classified events.
//!
//! Recovers a subject and value when the search term itself is a
//! `key=value` pair, or when the raw line carries `term=value` inline.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::{EventKind, LogEvent};

// brightness=80, mode="eco", label='Living Room'
static RE_TERM_KV: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|(.*?))\s*$"#).unwrap()
});

/// Refine `event` using `term`. Applying twice gives the same result as once.
pub fn augment(term: &str, event: LogEvent) -> LogEvent {
    if let Some((key, value)) = split_term_kv(term) {
        return LogEvent {
            subject: Some(key),
            value: Some(value),
            kind: EventKind::StateChanged,
            ..event
        };
    }

    match find_inline_kv(term, &event.raw_line) {
        Some(value) => LogEvent {
            subject: Some(term.to_string()),
            value: Some(value),
            kind: EventKind::StateChanged,
            value_from_inline_kv: true,
            ..event
        },
        None => event,
    }
}

/// Split a `key=value` search term. Quotes around the value are removed.
pub fn split_term_kv(term: &str) -> Option<(String, String)> {
    let caps = RE_TERM_KV.captures(term)?;
    let key = caps.get(1)?.as_str();
    let value = first_group(&caps, &[2, 3, 4])?.trim();
    if value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

/// Find `term=value` inside a raw line, treating `term` as literal text.
pub fn find_inline_kv(term: &str, line: &str) -> Option<String> {
    let re = inline_kv_pattern(term)?;
    let caps = re.captures(line)?;
    let value = first_group(&caps, &[1, 2, 3])?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

fn inline_kv_pattern(term: &str) -> Option<Regex> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let boundary = match term.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => r"\b",
        _ => "",
    };
    let pattern = format!(
        r#"{boundary}{}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"',;)\]}}]+))"#,
        regex::escape(term)
    );
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::debug!(error = %e, "inline key=value pattern rejected");
            None
        }
    }
}

fn first_group<'h>(caps: &regex::Captures<'h>, groups: &[usize]) -> Option<&'h str> {
    groups.iter().find_map(|&i| caps.get(i)).map(|m| m.as_str())
}
