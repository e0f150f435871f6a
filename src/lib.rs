//! Extract Fetcher Library
//!
//! A Rust library for mirroring data extract files from a remote, hierarchical
//! catalog. Builds the catalog through a time-boxed listing cache, selects files
//! by group, dataset, name and date, and downloads them concurrently with size
//! verification.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
