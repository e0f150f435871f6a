//! Core application logic for Extract Fetcher
//!
//! This module contains the catalog client, the listing snapshot cache, the
//! catalog indexer, the filter engine and the download pipeline.
//!
//! # Examples
//!
//! ```rust,no_run
//! use extract_fetcher::app::{
//!     filter_files, CacheConfig, CatalogIndexer, ClientConfig, Credentials, ExtractClient,
//!     FilterCriteria, SnapshotCache,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ExtractClient::new(ClientConfig::new(
//!     "https://intelligence.speedtest.net/extracts",
//!     Credentials::new("key", "secret"),
//! ))?;
//! let mut cache = SnapshotCache::open(CacheConfig::default()).await;
//!
//! let catalog = CatalogIndexer::new(&client, &mut cache).build().await?;
//! cache.persist().await;
//!
//! let criteria = FilterCriteria::new().with_latest_only(true);
//! for file in filter_files(catalog.entries(), &criteria) {
//!     println!("{} {}", file.dataset, file.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod client;
pub mod filter;
pub mod models;
pub mod worker;

// Re-export main public API
pub use cache::{CacheConfig, SnapshotCache};
pub use catalog::{Catalog, CatalogIndexer};
pub use client::{ClientConfig, Credentials, ExtractClient};
pub use filter::{filter_files, sort_matches, FilterCriteria};
pub use models::{CatalogEntry, EntryKind, MatchedFile};
pub use worker::{DownloadSummary, DownloadTask, WorkerConfig, WorkerPool};
