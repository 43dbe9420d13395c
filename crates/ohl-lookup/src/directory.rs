//! openHAB REST item directory.
//!
//! Fetches the names of all items (`/rest/items`) and the UIDs of all
//! things (`/rest/things`) so a lookup can tell a known entity name from free text.
//! The name set is cached and only changes on `refresh`; a failed refresh
//! keeps whatever was there before.

use serde::Deserialize;
use std::collections::HashSet;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Configuration for the REST item directory.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    /// openHAB base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether the directory is consulted at all.
    #[serde(default)]
    pub enabled: bool,
}

fn default_base_url() -> String {
    "http://localhost:8080".into()
}
fn default_timeout_secs() -> u64 {
    5
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            enabled: false,
        }
    }
}

/// Errors from talking to the openHAB REST API.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },
    #[error("invalid response from {url}: {message}")]
    Body { url: String, message: String },
}

/// `/rest/items` entry (only fields we need).
#[derive(Deserialize)]
struct ItemEntry {
    name: String,
}

/// `/rest/things` entry (only fields we need).
#[derive(Deserialize)]
struct ThingEntry {
    #[serde(rename = "UID")]
    uid: String,
}

/// Cached set of item and thing names known to openHAB.
pub struct ItemDirectory {
    client: reqwest::Client,
    config: DirectoryConfig,
    names: RwLock<HashSet<String>>,
}

impl ItemDirectory {
    pub fn new(config: DirectoryConfig) -> Result<Self, DirectoryError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DirectoryError::Client(e.to_string()))?;
        Ok(Self {
            client,
            config,
            names: RwLock::new(HashSet::new()),
        })
    }

    /// Re-fetch the name set. Returns whether the cache was replaced.
    pub async fn refresh(&self) -> bool {
        match self.fetch_names().await {
            Ok(fresh) => {
                tracing::debug!(count = fresh.len(), "item directory refreshed");
                *self.names.write().await = fresh;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "item directory refresh failed, keeping previous names");
                false
            }
        }
    }

    /// Read access to the currently cached names.
    pub async fn names(&self) -> RwLockReadGuard<'_, HashSet<String>> {
        self.names.read().await
    }

    /// Fetch item names and thing UIDs from the REST API.
    ///
    /// Thing labels are left out: the event log only ever quotes UIDs.
    pub async fn fetch_names(&self) -> Result<HashSet<String>, DirectoryError> {
        let items: Vec<ItemEntry> = self.get_json("/rest/items?fields=name").await?;
        let things: Vec<ThingEntry> = self.get_json("/rest/things").await?;

        Ok(items
            .into_iter()
            .map(|i| i.name)
            .chain(things.into_iter().map(|t| t.uid))
            .collect())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, DirectoryError> {
        let url = format!("{}{path}", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DirectoryError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(DirectoryError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        response.json().await.map_err(|e| DirectoryError::Body {
            url,
            message: e.to_string(),
        })
    }
}
