//! Mock log source for testing — serves pre-loaded log content.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::error::{LogError, LogResult};
use crate::source::LogSource;

/// Failure a mock path reports instead of searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Unavailable,
    Timeout,
    Io,
}

/// A mock log source that serves pre-loaded content by path.
///
/// Records every lookup so tests can assert which needles were used.
pub struct MockLogSource {
    files: HashMap<String, Vec<String>>,
    failures: HashMap<String, MockFailure>,
    delays: HashMap<String, Duration>,
    calls: AtomicUsize,
    lookups: Mutex<Vec<(String, String)>>,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            failures: HashMap::new(),
            delays: HashMap::new(),
            calls: AtomicUsize::new(0),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Add a file with the given lines.
    pub fn add_file(&mut self, path: impl Into<String>, lines: Vec<String>) {
        self.files.insert(path.into(), lines);
    }

    /// Make lookups against `path` fail.
    pub fn fail_path(&mut self, path: impl Into<String>, failure: MockFailure) {
        self.failures.insert(path.into(), failure);
    }

    /// Make lookups against `path` sleep before answering.
    pub fn delay_path(&mut self, path: impl Into<String>, delay: Duration) {
        self.delays.insert(path.into(), delay);
    }

    /// Number of `find_last_match` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every `(path, term)` looked up, in call order.
    pub async fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().await.clone()
    }

    /// Create a mock with sample openHAB `events.log` and `openhab.log` files.
    pub fn with_openhab_sample() -> Self {
        let mut m = Self::new();
        m.add_file(
            "/var/log/openhab/events.log",
            vec![
                "2024-01-15 08:59:58.120 [INFO ] [openhab.event.ThingStatusInfoChangedEvent] - Thing 'zwave:device:ctrl:node5' changed from OFFLINE to ONLINE".into(),
                "2024-01-15 09:00:00.000 [INFO ] [openhab.event.ItemStateChangedEvent     ] - Item 'Kitchen_Light' changed from OFF to ON".into(),
                "2024-01-15 09:00:01.500 [INFO ] [openhab.event.ItemCommandEvent          ] - Item 'Thermostat' received command 21.5 (source: org.openhab.core.io.console)".into(),
                "2024-01-15 09:00:02.250 [INFO ] [openhab.event.GroupItemStateChangedEvent] - Item 'gLights' changed from OFF to ON through Kitchen_Light".into(),
                "2024-01-15 09:00:03.000 [INFO ] [openhab.event.ItemStateChangedEvent     ] - Item 'Kitchen_Light_2' changed from ON to OFF".into(),
                "2024-01-15 09:00:04.000 [INFO ] [openhab.event.ItemStateChangedEvent     ] - Item 'Fan1_Speed' changed from 50 to 75 (source: org.openhab.core.thing$Fan)".into(),
            ],
        );
        m.add_file(
            "/var/log/openhab/openhab.log",
            vec![
                "2024-01-15 08:59:50.000 [INFO ] [org.openhab.core.model.script] - Rule engine started".into(),
                "2024-01-15 09:00:05.000 [DEBUG] [org.openhab.binding.mqtt       ] - publish Fan1=\"75%\" to home/fan".into(),
                "2024-01-15 09:00:06.000 [WARN ] [org.openhab.binding.zwave      ] - Node 5: brightness=80 not acknowledged".into(),
            ],
        );
        m
    }
}

impl Default for MockLogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    async fn find_last_match(&self, path: &str, term: &str) -> LogResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lookups
            .lock()
            .await
            .push((path.to_string(), term.to_string()));

        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }

        match self.failures.get(path) {
            Some(MockFailure::Unavailable) => {
                return Err(LogError::SearchUnavailable(format!("mock: {path}")));
            }
            Some(MockFailure::Timeout) => {
                return Err(LogError::Timeout {
                    path: path.to_string(),
                    after: crate::source::DEFAULT_TIMEOUT,
                });
            }
            Some(MockFailure::Io) => return Err(LogError::Io(format!("mock: {path}"))),
            None => {}
        }

        let lines = self
            .files
            .get(path)
            .ok_or_else(|| LogError::NotFound(path.to_string()))?;
        Ok(lines.iter().rev().find(|l| l.contains(term)).cloned())
    }
}
