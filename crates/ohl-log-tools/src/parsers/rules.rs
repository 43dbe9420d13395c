//! Structural recognizers for openHAB event log phrasings.
//!
//! Each rule is one regex plus an extractor. `RULES` lists them in priority
//! order; the classifier takes the first rule that matches.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::EventKind;

// Item 'Name' changed from OLD to NEW (source: org.openhab.core...)
static RE_ITEM_CHANGED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Item '([^']+)' changed from (.*?) to (.+?)(?: \(source: [^)]*\))?$").unwrap()
});

// Item 'gGroup' changed from OLD to NEW through Member
static RE_ITEM_CHANGED_THROUGH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Item '([^']+)' changed from (.*?) to (.+?) through (.+)$").unwrap()
});

// Item 'Name' received command CMD (source: ...)
static RE_ITEM_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Item '([^']+)' received command (.+?)(?: \(source: [^)]*\))?$").unwrap()
});

// Thing 'binding:type:id' changed from ONLINE to OFFLINE (COMMUNICATION_ERROR)
static RE_THING_CHANGED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Thing '([^']+)' changed from (.*?) to (.+)$").unwrap());

/// Fields pulled out of a line by a matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub kind: EventKind,
    pub subject: String,
    pub value: String,
}

/// A single structural recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRule {
    ItemChanged,
    ItemChangedThrough,
    ItemCommand,
    ThingChanged,
}

/// All rules, highest priority first.
pub const RULES: [EventRule; 4] = [
    EventRule::ItemChanged,
    EventRule::ItemChangedThrough,
    EventRule::ItemCommand,
    EventRule::ThingChanged,
];

impl EventRule {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::ItemChanged | Self::ItemChangedThrough => EventKind::StateChanged,
            Self::ItemCommand => EventKind::CommandReceived,
            Self::ThingChanged => EventKind::ThingStatusChanged,
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::ItemChanged => &RE_ITEM_CHANGED,
            Self::ItemChangedThrough => &RE_ITEM_CHANGED_THROUGH,
            Self::ItemCommand => &RE_ITEM_COMMAND,
            Self::ThingChanged => &RE_THING_CHANGED,
        }
    }

    /// Capture group holding the resulting value.
    fn value_group(&self) -> usize {
        match self {
            Self::ItemCommand => 2,
            _ => 3,
        }
    }

    /// Try this rule against a line with trailing whitespace removed.
    pub fn apply(&self, body: &str) -> Option<Extracted> {
        let caps = self.pattern().captures(body)?;
        let subject = caps.get(1)?.as_str();
        let raw_value = caps.get(self.value_group())?.as_str();

        // Group relays belong to the next rule.
        if *self == Self::ItemChanged && raw_value.contains(" through ") {
            return None;
        }

        let value = raw_value.trim();
        if value.is_empty() {
            return None;
        }

        Some(Extracted {
            kind: self.kind(),
            subject: subject.to_string(),
            value: value.to_string(),
        })
    }
}
