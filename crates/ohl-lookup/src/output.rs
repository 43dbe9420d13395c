//! Presentation of lookup results as plain text or JSON.

use chrono::NaiveDateTime;

use ohl_log_tools::{EventKind, LogEvent};

/// Render a lookup result for a terminal.
///
/// `now` is the local wall-clock time used for the relative age.
pub fn render_text(term: &str, event: Option<&LogEvent>, now: NaiveDateTime) -> String {
    let Some(event) = event else {
        return format!("No log entry found for '{term}'");
    };

    let mut out = String::new();
    match (&event.subject, &event.value) {
        (Some(subject), Some(value)) => {
            out.push_str(&format!("{subject}: {value}  ({})", describe(event)));
        }
        _ => out.push_str(&format!("'{term}' last seen in the log")),
    }

    if let Some(ts) = event.parsed_timestamp() {
        out.push_str(&format!("\n  at {}", event.timestamp));
        if let Some(age) = format_age(now - ts) {
            out.push_str(&format!(" ({age})"));
        }
    }

    out.push_str(&format!("\n  {}", event.raw_line.trim_end()));
    out
}

/// Render a lookup result as a single JSON document (`null` when not found).
pub fn render_json(event: Option<&LogEvent>) -> serde_json::Result<String> {
    serde_json::to_string(&event)
}

fn describe(event: &LogEvent) -> &'static str {
    match event.kind {
        EventKind::StateChanged if event.value_from_inline_kv => "inline value",
        EventKind::StateChanged => "state changed",
        EventKind::CommandReceived => "command received",
        EventKind::ThingStatusChanged => "thing status",
        EventKind::Unclassified => "unclassified",
    }
}

/// Human-readable "how long ago". `None` for times in the future.
pub fn format_age(elapsed: chrono::TimeDelta) -> Option<String> {
    let secs = elapsed.num_seconds();
    if secs < 0 {
        return None;
    }
    let text = match secs {
        0..=9 => "just now".to_string(),
        10..=59 => format!("{secs} seconds ago"),
        60..=3599 => plural(secs / 60, "minute"),
        3600..=86_399 => plural(secs / 3600, "hour"),
        _ => plural(secs / 86_400, "day"),
    };
    Some(text)
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use ohl_log_tools::classify;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-01-01 10:05:00.000", "%Y-%m-%d %H:%M:%S%.3f").unwrap()
    }

    #[test]
    fn text_for_state_change() {
        let event =
            classify("2024-01-01 10:00:00.000 [INFO ] Item 'Kitchen_Light' changed from OFF to ON")
                .unwrap();
        let text = render_text("Kitchen_Light", Some(&event), now());
        assert!(text.starts_with("Kitchen_Light: ON  (state changed)"));
        assert!(text.contains("at 2024-01-01 10:00:00.000 (5 minutes ago)"));
        assert!(text.ends_with("changed from OFF to ON"));
    }

    #[test]
    fn text_for_unclassified_without_timestamp() {
        let event = classify("binding restarted").unwrap();
        let text = render_text("binding", Some(&event), now());
        assert_eq!(text, "'binding' last seen in the log\n  binding restarted");
    }

    #[test]
    fn text_for_not_found() {
        assert_eq!(
            render_text("Garage", None, now()),
            "No log entry found for 'Garage'"
        );
    }

    #[test]
    fn json_round_trip_and_null() {
        let event = classify("Item 'Lamp' received command ON").unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render_json(Some(&event)).unwrap()).unwrap();
        assert_eq!(json["kind"], "command_received");
        assert_eq!(json["subject"], "Lamp");
        assert_eq!(render_json(None).unwrap(), "null");
    }

    #[test]
    fn ages() {
        assert_eq!(format_age(TimeDelta::seconds(3)).as_deref(), Some("just now"));
        assert_eq!(format_age(TimeDelta::seconds(42)).as_deref(), Some("42 seconds ago"));
        assert_eq!(format_age(TimeDelta::seconds(60)).as_deref(), Some("1 minute ago"));
        assert_eq!(format_age(TimeDelta::hours(3)).as_deref(), Some("3 hours ago"));
        assert_eq!(format_age(TimeDelta::days(2)).as_deref(), Some("2 days ago"));
        assert_eq!(format_age(TimeDelta::seconds(-5)), None);
    }
}
