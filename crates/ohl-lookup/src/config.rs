//! Lookup configuration, loadable from TOML.

use serde::Deserialize;
use std::path::Path;

use ohl_log_tools::QueryConfig;

use crate::directory::DirectoryConfig;

/// Default location of the config file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/openhab/ohl-lookup.toml";

/// How "last matching line" lookups are performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceBackend {
    /// In-process reverse scan.
    #[default]
    File,
    /// External `grep -F`.
    Grep,
}

/// Top-level configuration for the lookup tool.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Which lookup implementation to use.
    #[serde(default)]
    pub backend: SourceBackend,
    /// Program used by the grep backend.
    #[serde(default = "default_grep_program")]
    pub grep_program: String,
    /// Log paths and per-lookup timeout.
    #[serde(default)]
    pub query: QueryConfig,
    /// REST item directory settings.
    #[serde(default)]
    pub directory: DirectoryConfig,
}

fn default_grep_program() -> String {
    "grep".into()
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            backend: SourceBackend::default(),
            grep_program: default_grep_program(),
            query: QueryConfig::default(),
            directory: DirectoryConfig::default(),
        }
    }
}

impl LookupConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path, "config file not found, using defaults");
            Ok(Self::default())
        }
    }
}
