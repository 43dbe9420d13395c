//! Line classifier for the openHAB event log format.
//!
//! A line is an optional `YYYY-MM-DD HH:MM:SS.mmm` timestamp followed by
//! either one of the phrasings in [`rules`] or arbitrary text.

pub mod rules;

use regex::Regex;
use std::sync::LazyLock;

use crate::types::LogEvent;
use rules::RULES;

static RE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3})(?:\s|$)").unwrap()
});

/// Classify one raw log line.
///
/// Returns `None` only for empty or whitespace-only input. Lines that match
/// no rule still come back, as [`EventKind::Unclassified`](crate::types::EventKind),
/// since they prove the term occurred.
pub fn classify(line: &str) -> Option<LogEvent> {
    if line.trim().is_empty() {
        return None;
    }

    let timestamp = extract_timestamp(line).unwrap_or_default();
    let body = line.trim_end();

    let event = match RULES.iter().find_map(|rule| rule.apply(body)) {
        Some(x) => LogEvent {
            timestamp: timestamp.to_string(),
            subject: Some(x.subject),
            value: Some(x.value),
            kind: x.kind,
            raw_line: line.to_string(),
            value_from_inline_kv: false,
        },
        None => LogEvent::unclassified(timestamp, line),
    };
    Some(event)
}

/// Leading timestamp, if the line starts with one in the exact format.
pub fn extract_timestamp(line: &str) -> Option<&str> {
    RE_TIMESTAMP
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;
    use proptest::prelude::*;

    #[test]
    fn empty_and_blank_lines() {
        assert!(classify("").is_none());
        assert!(classify("   \t").is_none());
    }

    #[test]
    fn unstructured_line() {
        let event = classify("no structure here").unwrap();
        assert_eq!(event.kind, EventKind::Unclassified);
        assert!(event.subject.is_none());
        assert!(event.value.is_none());
        assert_eq!(event.timestamp, "");
        assert_eq!(event.raw_line, "no structure here");
    }

    #[test]
    fn state_change_with_timestamp() {
        let line = "2024-01-01 10:00:00.000 [INFO ] Item 'Kitchen_Light' changed from OFF to ON";
        let event = classify(line).unwrap();
        assert_eq!(event.timestamp, "2024-01-01 10:00:00.000");
        assert_eq!(event.subject.as_deref(), Some("Kitchen_Light"));
        assert_eq!(event.value.as_deref(), Some("ON"));
        assert_eq!(event.kind, EventKind::StateChanged);
        assert_eq!(event.raw_line, line);
        assert!(!event.value_from_inline_kv);
    }

    #[test]
    fn command_strips_source() {
        let line = "2024-01-01 10:00:01.123 [INFO ] [openhab.event.ItemCommandEvent    ] - \
                    Item 'Thermostat' received command 21.5 (source: console)";
        let event = classify(line).unwrap();
        assert_eq!(event.kind, EventKind::CommandReceived);
        assert_eq!(event.subject.as_deref(), Some("Thermostat"));
        assert_eq!(event.value.as_deref(), Some("21.5"));
    }

    #[test]
    fn relayed_change_is_state_change() {
        let event = classify(
            "2024-01-01 10:00:02.000 [INFO ] Item 'gLights' changed from OFF to ON through Hall",
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::StateChanged);
        assert_eq!(event.subject.as_deref(), Some("gLights"));
        assert_eq!(event.value.as_deref(), Some("ON"));
    }

    #[test]
    fn thing_status() {
        let event = classify(
            "2024-01-01 10:00:03.000 [INFO ] Thing 'mqtt:topic:broker:fan' changed from ONLINE to OFFLINE",
        )
        .unwrap();
        assert_eq!(event.kind, EventKind::ThingStatusChanged);
        assert_eq!(event.subject.as_deref(), Some("mqtt:topic:broker:fan"));
        assert_eq!(event.value.as_deref(), Some("OFFLINE"));
    }

    #[test]
    fn missing_timestamp_is_not_fatal() {
        let event = classify("Item 'Door' changed from CLOSED to OPEN").unwrap();
        assert_eq!(event.timestamp, "");
        assert_eq!(event.value.as_deref(), Some("OPEN"));
    }

    #[test]
    fn crlf_line_keeps_raw_but_not_value() {
        let line = "2024-01-01 10:00:00.000 Item 'Door' changed from CLOSED to OPEN\r";
        let event = classify(line).unwrap();
        assert_eq!(event.value.as_deref(), Some("OPEN"));
        assert_eq!(event.raw_line, line);
    }

    #[test]
    fn malformed_timestamp_is_ignored() {
        assert_eq!(extract_timestamp("2024-01-01 10:00:00.0001 x"), None);
        assert_eq!(extract_timestamp("2024-01-01 10:00:00 x"), None);
        assert_eq!(extract_timestamp("x 2024-01-01 10:00:00.000"), None);
        assert_eq!(
            extract_timestamp("2024-01-01 10:00:00.000"),
            Some("2024-01-01 10:00:00.000")
        );
    }

    proptest! {
        #[test]
        fn prop_state_change_extracts_name_and_new_state(
            name in "[A-Za-z][A-Za-z0-9_]{0,20}",
            old in "[A-Z0-9]{1,8}",
            new in "[A-Za-z0-9.%]{1,10}",
            with_source in any::<bool>(),
        ) {
            let mut line = format!("2024-03-04 05:06:07.890 [INFO ] Item '{name}' changed from {old} to {new}");
            if with_source {
                line.push_str(" (source: org.openhab.core.io.rest)");
            }
            let event = classify(&line).unwrap();
            prop_assert_eq!(event.kind, EventKind::StateChanged);
            prop_assert_eq!(event.subject.as_deref(), Some(name.as_str()));
            prop_assert_eq!(event.value.as_deref(), Some(new.as_str()));
        }

        #[test]
        fn prop_command_value_is_trimmed(
            name in "[A-Za-z][A-Za-z0-9_]{0,20}",
            cmd in "[A-Za-z0-9]{1,8}( [A-Za-z0-9]{1,8}){0,2}",
            pad in " {0,3}",
        ) {
            let line = format!("Item '{name}' received command {cmd}{pad}");
            let event = classify(&line).unwrap();
            prop_assert_eq!(event.kind, EventKind::CommandReceived);
            prop_assert_eq!(event.value.as_deref(), Some(cmd.as_str()));
        }

        #[test]
        fn prop_non_blank_lines_always_classify(line in "\\PC*") {
            match classify(&line) {
                None => prop_assert!(line.trim().is_empty()),
                Some(event) => {
                    prop_assert_eq!(&event.raw_line, &line);
                    if let Some(value) = &event.value {
                        prop_assert!(!value.trim().is_empty());
                    }
                }
            }
        }
    }
}
