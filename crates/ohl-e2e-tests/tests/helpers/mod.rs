//! Shared test harness for E2E integration tests.
//!
//! Writes real `events.log` / `openhab.log` files into a temp directory and
//! points a `LookupConfig` at them, so every suite exercises the real file
//! scan, classifier, augmenter and query engine together.

#![allow(dead_code)]

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

use ohl_lookup::config::LookupConfig;
use ohl_lookup::directory::DirectoryConfig;
use ohl_lookup::lookup::LookupService;

/// Temp-dir backed openHAB log pair.
pub struct TestHarness {
    dir: TempDir,
    pub events_log: PathBuf,
    pub app_log: PathBuf,
}

impl TestHarness {
    /// Empty log files.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let events_log = dir.path().join("events.log");
        let app_log = dir.path().join("openhab.log");
        std::fs::write(&events_log, "").unwrap();
        std::fs::write(&app_log, "").unwrap();
        Self {
            dir,
            events_log,
            app_log,
        }
    }

    /// Logs pre-filled with a short morning of household events.
    pub fn with_sample_logs() -> Self {
        let h = Self::new();
        h.append_events(&[
            "2024-01-15 08:59:58.120 [INFO ] [openhab.event.ThingStatusInfoChangedEvent] - Thing 'zwave:device:ctrl:node5' changed from OFFLINE to ONLINE",
            "2024-01-15 09:00:00.000 [INFO ] [openhab.event.ItemStateChangedEvent     ] - Item 'Kitchen_Light' changed from OFF to ON",
            "2024-01-15 09:00:01.500 [INFO ] [openhab.event.ItemCommandEvent          ] - Item 'Thermostat' received command 21.5 (source: console)",
            "2024-01-15 09:00:02.250 [INFO ] [openhab.event.GroupItemStateChangedEvent] - Item 'gLights' changed from OFF to ON through Kitchen_Light",
            "2024-01-15 09:00:03.000 [INFO ] [openhab.event.ItemStateChangedEvent     ] - Item 'Kitchen_Light_2' changed from ON to OFF",
        ]);
        h.append_app(&[
            "2024-01-15 08:59:50.000 [INFO ] [org.openhab.core.model.script] - Rule engine started",
            "2024-01-15 09:00:05.000 [DEBUG] [org.openhab.binding.mqtt       ] - publish Fan1=\"75%\" to home/fan",
            "2024-01-15 09:00:06.000 [WARN ] [org.openhab.binding.zwave      ] - Node 5: brightness=80 not acknowledged",
        ]);
        h
    }

    pub fn append_events(&self, lines: &[&str]) {
        append(&self.events_log, lines);
    }

    pub fn append_app(&self, lines: &[&str]) {
        append(&self.app_log, lines);
    }

    /// Config pointing at the temp logs, directory disabled.
    pub fn config(&self) -> LookupConfig {
        let mut config = LookupConfig::default();
        config.query.events_log = self.events_log.to_string_lossy().into_owned();
        config.query.app_log = Some(self.app_log.to_string_lossy().into_owned());
        config
    }

    /// Config with the REST directory enabled at `base_url`.
    pub fn config_with_directory(&self, base_url: &str) -> LookupConfig {
        let mut config = self.config();
        config.directory = DirectoryConfig {
            base_url: base_url.to_string(),
            timeout_secs: 2,
            enabled: true,
        };
        config
    }

    pub fn service(&self) -> LookupService {
        LookupService::from_config(&self.config()).unwrap()
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}

fn append(path: &PathBuf, lines: &[&str]) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
}
