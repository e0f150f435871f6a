//! Application constants for Extract Fetcher
//!
//! This module centralizes the constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names for credential overrides
pub mod env {
    /// Environment variable overriding the configured api key
    pub const API_KEY: &str = "EXTRACT_API_KEY";

    /// Environment variable overriding the configured api secret
    pub const API_SECRET: &str = "EXTRACT_API_SECRET";

    /// Environment variable overriding the catalog base URL
    pub const EXTRACT_URL: &str = "EXTRACT_URL";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// User agent sent with every request
    pub const USER_AGENT: &str = concat!("ookla/speedtest-extract/", env!("CARGO_PKG_VERSION"));

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;
}

/// Catalog service defaults and naming rules
pub mod catalog {
    /// Default catalog base URL
    pub const DEFAULT_EXTRACT_URL: &str = "https://intelligence.speedtest.net/extracts";

    /// Marker separating the dataset name from the date in a file name
    pub const DATE_MARKER: &str = "_20";

    /// Files whose name contains this are column header files, not datasets
    pub const HEADERS_MARKER: &str = "headers";

    /// Extension appended to filename filters so users may omit it
    pub const FILENAME_EXTENSION: &str = ".zip";

    /// Day format accepted by the `--since` filter
    pub const SINCE_FORMAT: &str = "%Y-%m-%d";
}

/// File operation constants
pub mod files {
    /// Default configuration file name in the working directory
    pub const CONFIG_FILE_NAME: &str = "extract-fetcher.toml";

    /// Application directory name under the user config directory
    pub const APP_DIR_NAME: &str = "extract-fetcher";

    /// Default snapshot cache file name
    pub const CACHE_FILE_NAME: &str = ".extracts-cache.json";

    /// Default storage directory
    pub const STORAGE_DIRECTORY: &str = ".";

    /// Permissions for directories created during download (Unix only)
    #[cfg(unix)]
    pub const DIRECTORY_PERMISSIONS: u32 = 0o700;
}

/// Worker and concurrency configuration
pub mod workers {
    /// Default number of download workers
    pub const DEFAULT_WORKER_COUNT: usize = 1;
}

/// Snapshot cache defaults
pub mod cache {
    /// Cache duration in minutes; non-positive disables caching
    pub const DEFAULT_DURATION_MINUTES: i64 = -1;
}

/// Placeholder credentials written into a generated config file
pub mod placeholders {
    /// Placeholder api key
    pub const API_KEY: &str = "my-api-key";

    /// Placeholder api secret
    pub const API_SECRET: &str = "my-api-secret";
}

pub use catalog::{DATE_MARKER, DEFAULT_EXTRACT_URL, HEADERS_MARKER};
pub use http::USER_AGENT;
pub use workers::DEFAULT_WORKER_COUNT;
