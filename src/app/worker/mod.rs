//! Download pipeline for concurrent file mirroring
//!
//! Matched files are turned into owned `DownloadTask`s and handed to a
//! `WorkerPool`. Each worker drives one file at a time to a terminal
//! `DownloadState`: skipped when already present, verified when the
//! downloaded size matches the catalog, or one of the failure states.
//!
//! # Module Organization
//!
//! - [`config`] - Pool size, storage layout and overwrite policy
//! - [`types`] - Tasks, outcomes, progress events and summaries
//! - [`core`] - Individual worker and per-file state machine
//! - [`pool`] - Queue setup, worker lifecycle and result aggregation
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use extract_fetcher::app::client::{ClientConfig, Credentials, ExtractClient};
//! use extract_fetcher::app::worker::{DownloadTask, WorkerConfig, WorkerPool};
//! use std::sync::Arc;
//!
//! # async fn example(tasks: Vec<DownloadTask>) -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(ExtractClient::new(ClientConfig::new(
//!     "https://intelligence.speedtest.net/extracts",
//!     Credentials::new("key", "secret"),
//! ))?);
//!
//! let config = WorkerConfig::new("./extracts").with_worker_count(4);
//! let report = WorkerPool::new(config, client).run(tasks, None).await?;
//! println!("{}", report.summary);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod pool;
pub mod types;

pub use config::WorkerConfig;
pub use self::core::{create_directory_chain, DownloadWorker};
pub use pool::{PoolReport, WorkerPool};
pub use types::{DownloadOutcome, DownloadState, DownloadSummary, DownloadTask, WorkerEvent};
