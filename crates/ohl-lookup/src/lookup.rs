//! Lookup service: wires config, log source, item directory and engine.

use std::sync::Arc;
use std::time::Duration;

use ohl_log_tools::{
    FileLogSource, GrepLogSource, LogEvent, LogQueryEngine, LogResult, LogSource, SearchStrategy,
};

use crate::config::{LookupConfig, SourceBackend};
use crate::directory::ItemDirectory;

/// Build the log source selected by `config.backend`.
pub fn build_source(config: &LookupConfig) -> Arc<dyn LogSource> {
    let timeout = Duration::from_secs(config.query.timeout_secs);
    match config.backend {
        SourceBackend::File => Arc::new(FileLogSource::new(timeout)),
        SourceBackend::Grep => Arc::new(GrepLogSource::with_program(
            config.grep_program.clone(),
            timeout,
        )),
    }
}

/// Answers "what happened last to X" queries.
///
/// The directory, when present, only influences the search strategy; it is
/// refreshed by the caller, never during a lookup.
pub struct LookupService {
    engine: LogQueryEngine,
    directory: Option<ItemDirectory>,
}

impl LookupService {
    pub fn new(engine: LogQueryEngine, directory: Option<ItemDirectory>) -> Self {
        Self { engine, directory }
    }

    /// Build from config, with a REST directory if it is enabled.
    pub fn from_config(config: &LookupConfig) -> anyhow::Result<Self> {
        let engine = LogQueryEngine::new(build_source(config), config.query.clone());
        let directory = if config.directory.enabled {
            Some(ItemDirectory::new(config.directory.clone())?)
        } else {
            None
        };
        Ok(Self::new(engine, directory))
    }

    pub fn directory(&self) -> Option<&ItemDirectory> {
        self.directory.as_ref()
    }

    /// Refresh the directory, if any. Returns whether names are available.
    pub async fn refresh_directory(&self) -> bool {
        match &self.directory {
            Some(directory) => directory.refresh().await,
            None => false,
        }
    }

    /// Strategy for `term` given the directory's current names.
    pub async fn strategy_for(&self, term: &str) -> SearchStrategy {
        match &self.directory {
            Some(directory) => SearchStrategy::choose(term, &*directory.names().await),
            None => SearchStrategy::FreeText,
        }
    }

    /// Run one lookup.
    pub async fn lookup(&self, term: &str) -> LogResult<Option<LogEvent>> {
        let strategy = self.strategy_for(term).await;
        tracing::debug!(term = %term, strategy = ?strategy, "running lookup");
        self.engine.search_log_with(term, strategy).await
    }
}
