//! Time-boxed snapshot of catalog listings
//!
//! A snapshot maps full request URLs to the raw single-level listing returned
//! for them. One snapshot exists per run: it is either loaded from disk (and
//! then answers lookups) or built fresh from this run's requests (and then
//! persisted once the catalog build succeeds).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::app::models::CatalogEntry;

use super::config::CacheConfig;

/// On-disk snapshot document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// When the snapshot was written
    pub timestamp: DateTime<Utc>,
    /// Request URL -> single-level listing
    pub responses: HashMap<String, Vec<CatalogEntry>>,
}

impl CacheSnapshot {
    /// Age of the snapshot relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.timestamp)
    }
}

#[derive(Debug)]
enum SnapshotState {
    /// Caching disabled: no lookups, nothing recorded or written
    Disabled,
    /// Valid snapshot read from disk
    Loaded(CacheSnapshot),
    /// Snapshot being built from this run's requests
    Fresh(HashMap<String, Vec<CatalogEntry>>),
}

/// Cache store consulted by the catalog indexer before every request
#[derive(Debug)]
pub struct SnapshotCache {
    config: CacheConfig,
    state: SnapshotState,
}

impl SnapshotCache {
    /// Opens the snapshot described by `config`
    ///
    /// Missing, unreadable, unparsable, empty or expired snapshots are all
    /// treated as a miss and a fresh snapshot is started instead.
    pub async fn open(config: CacheConfig) -> Self {
        let Some(max_age) = config.max_age() else {
            debug!("snapshot cache disabled");
            return Self::disabled();
        };

        debug!("cache enabled");
        let state = match Self::read_snapshot(&config).await {
            Some(snapshot) if snapshot.responses.is_empty() => {
                debug!("cache file is empty, ignoring");
                SnapshotState::Fresh(HashMap::new())
            }
            Some(snapshot) if snapshot.age(Utc::now()) < max_age => {
                info!("Using cached request from {}", snapshot.timestamp);
                SnapshotState::Loaded(snapshot)
            }
            Some(_) => {
                debug!("cache file too old, ignoring");
                SnapshotState::Fresh(HashMap::new())
            }
            None => {
                debug!("no valid cache file found, creating new");
                SnapshotState::Fresh(HashMap::new())
            }
        };

        Self { config, state }
    }

    /// A cache store that never hits and never writes
    pub fn disabled() -> Self {
        Self {
            config: CacheConfig::default(),
            state: SnapshotState::Disabled,
        }
    }

    async fn read_snapshot(config: &CacheConfig) -> Option<CacheSnapshot> {
        let content = match tokio::fs::read_to_string(&config.cache_file).await {
            Ok(content) => content,
            Err(e) => {
                debug!("cannot read cache file {}: {}", config.cache_file.display(), e);
                return None;
            }
        };
        debug!("found cache file {}", config.cache_file.display());

        match serde_json::from_str(&content) {
            Ok(snapshot) => {
                debug!("parsed cache file");
                Some(snapshot)
            }
            Err(e) => {
                debug!("cannot parse cache file {}: {}", config.cache_file.display(), e);
                None
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, SnapshotState::Disabled)
    }

    /// Whether this run's snapshot was built from fresh requests
    pub fn is_fresh(&self) -> bool {
        matches!(self.state, SnapshotState::Fresh(_))
    }

    /// Cached listing for a request URL, if a valid snapshot was loaded
    pub fn load(&self, url: &str) -> Option<Vec<CatalogEntry>> {
        match &self.state {
            SnapshotState::Loaded(snapshot) => {
                let listing = snapshot.responses.get(url).cloned();
                if listing.is_some() {
                    debug!("using cached data from {}", url);
                }
                listing
            }
            _ => None,
        }
    }

    /// Record a freshly fetched listing
    ///
    /// Recording into a loaded snapshot means it was missing a path; the
    /// snapshot is then treated as fresh so the completed set is written back.
    pub fn record(&mut self, url: &str, listing: &[CatalogEntry]) {
        let state = std::mem::replace(&mut self.state, SnapshotState::Disabled);
        self.state = match state {
            SnapshotState::Disabled => SnapshotState::Disabled,
            SnapshotState::Loaded(snapshot) => {
                debug!("cached snapshot is missing {}, rebuilding", url);
                let mut responses = snapshot.responses;
                responses.insert(url.to_string(), listing.to_vec());
                SnapshotState::Fresh(responses)
            }
            SnapshotState::Fresh(mut responses) => {
                responses.insert(url.to_string(), listing.to_vec());
                SnapshotState::Fresh(responses)
            }
        };
    }

    /// Number of listings held by the snapshot
    pub fn len(&self) -> usize {
        match &self.state {
            SnapshotState::Disabled => 0,
            SnapshotState::Loaded(snapshot) => snapshot.responses.len(),
            SnapshotState::Fresh(responses) => responses.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write a fresh snapshot to disk
    ///
    /// Loaded snapshots and disabled caches are never written. Write failures
    /// are logged and otherwise ignored. Returns whether a file was written.
    pub async fn persist(&self) -> bool {
        let SnapshotState::Fresh(responses) = &self.state else {
            return false;
        };

        let snapshot = CacheSnapshot {
            timestamp: Utc::now(),
            responses: responses.clone(),
        };

        let content = match serde_json::to_string(&snapshot) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to serialize listing cache: {}", e);
                return false;
            }
        };

        match tokio::fs::write(&self.config.cache_file, content).await {
            Ok(()) => {
                debug!(
                    "wrote {} listings to {}",
                    responses.len(),
                    self.config.cache_file.display()
                );
                true
            }
            Err(e) => {
                warn!(
                    "Failed to write listing cache {}: {}",
                    self.config.cache_file.display(),
                    e
                );
                false
            }
        }
    }
}
