//! Listing snapshot cache
//!
//! Catalog listings change rarely, so a full crawl can be stored as a single
//! JSON snapshot and reused for a configurable number of minutes. The snapshot
//! holds raw listing responses keyed by their full request URL; the catalog
//! indexer consults it before every request.
//!
//! # Module Organization
//!
//! - [`config`] - Snapshot file location and lifetime
//! - [`snapshot`] - Loading, recording and persisting snapshots
//!
//! # Examples
//!
//! ```rust,no_run
//! use extract_fetcher::app::cache::{CacheConfig, SnapshotCache};
//! use std::path::PathBuf;
//!
//! # async fn example() {
//! let config = CacheConfig::with_cache_file(PathBuf::from(".extracts-cache.json"))
//!     .with_duration_minutes(60);
//! let cache = SnapshotCache::open(config).await;
//!
//! if let Some(listing) = cache.load("https://intelligence.speedtest.net/extracts") {
//!     println!("{} cached root entries", listing.len());
//! }
//! # }
//! ```

pub mod config;
pub mod snapshot;

pub use config::CacheConfig;
pub use snapshot::{CacheSnapshot, SnapshotCache};
