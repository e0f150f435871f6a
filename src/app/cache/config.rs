//! Snapshot cache configuration types and defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{cache, files};

/// Configuration for the listing snapshot cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// Snapshot file location
    pub cache_file: PathBuf,
    /// How long a snapshot stays valid, in minutes (non-positive disables caching)
    pub duration_minutes: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from(files::CACHE_FILE_NAME),
            duration_minutes: cache::DEFAULT_DURATION_MINUTES,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with a custom snapshot file
    pub fn with_cache_file(cache_file: PathBuf) -> Self {
        Self {
            cache_file,
            ..Default::default()
        }
    }

    /// Set the snapshot lifetime in minutes
    pub fn with_duration_minutes(mut self, minutes: i64) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Caching is enabled only for a positive duration
    pub fn is_enabled(&self) -> bool {
        self.duration_minutes > 0
    }

    /// Snapshot lifetime, or `None` when caching is disabled
    ///
    /// Durations too large to represent never expire.
    pub fn max_age(&self) -> Option<chrono::Duration> {
        self.is_enabled().then(|| {
            chrono::Duration::try_minutes(self.duration_minutes)
                .unwrap_or_else(chrono::Duration::max_value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_disabled() {
        let config = CacheConfig::default();
        assert_eq!(config.cache_file, PathBuf::from(files::CACHE_FILE_NAME));
        assert!(!config.is_enabled());
        assert_eq!(config.max_age(), None);
    }

    #[test]
    fn test_config_builder() {
        let config = CacheConfig::with_cache_file(PathBuf::from("/tmp/snapshot.json"))
            .with_duration_minutes(30);

        assert!(config.is_enabled());
        assert_eq!(config.max_age(), Some(chrono::Duration::minutes(30)));
        assert!(!config.clone().with_duration_minutes(0).is_enabled());
    }

    #[test]
    fn test_huge_duration_never_expires() {
        let config = CacheConfig::default().with_duration_minutes(i64::MAX);
        assert!(config.is_enabled());
        assert_eq!(config.max_age(), Some(chrono::Duration::max_value()));
    }
}
