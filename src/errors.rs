//! Error types for Extract Fetcher
//!
//! This module defines the error types for every component of the application.
//! Catalog errors are fatal to a run, download errors are scoped to a single
//! file, and the top-level `AppError` is what command handlers return.

use std::path::PathBuf;
use thiserror::Error;

/// Catalog listing and traversal errors
///
/// Any of these aborts the whole catalog build; no partial tree is returned.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Root listing rejected the credentials (401/403)
    #[error("Authentication error. Please verify that the api key and secret are correct")]
    Auth,

    /// Root listing not found (404)
    #[error("The account associated with this api key has no files, please contact your technical account manager")]
    NotFound,

    /// Root listing failed with an internal server error (500)
    #[error("Server error, please contact your technical account manager")]
    Server,

    /// Root listing failed with any other non-success status
    #[error("Unexpected error retrieving extract info (HTTP {status}), try again and contact support if the problem persists")]
    UnknownStatus { status: u16 },

    /// Network failure at any depth of the traversal
    #[error("Failed to retrieve catalog listing from {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status while listing a nested directory
    #[error("Catalog listing {url} failed with HTTP {status}")]
    ListingStatus { url: String, status: u16 },

    /// Response body is not a catalog listing
    #[error("Invalid catalog listing returned from {url}")]
    InvalidListing {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configured base URL cannot be parsed
    #[error("Invalid catalog URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

impl CatalogError {
    /// Classify a non-success status returned for the root listing
    pub fn from_root_status(status: u16) -> Self {
        match status {
            401 | 403 => CatalogError::Auth,
            404 => CatalogError::NotFound,
            500 => CatalogError::Server,
            status => CatalogError::UnknownStatus { status },
        }
    }
}

/// Download errors, scoped to a single file
#[derive(Error, Debug)]
pub enum DownloadError {
    /// HTTP request failed before or while streaming the body
    #[error("HTTP request failed")]
    Transport(#[from] reqwest::Error),

    /// Server answered the download request with a non-success status
    #[error("Server error: HTTP {status}")]
    Status { status: u16 },

    /// Directory creation, file write or stat failed
    #[error("Filesystem error at {path}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Downloaded file size differs from the catalog size
    #[error("File size mismatch for {file_name}. Expected: {expected} bytes, received: {actual} bytes")]
    SizeMismatch {
        file_name: String,
        expected: u64,
        actual: u64,
    },

    /// Download URL cannot be resolved
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },

    /// A catalog name cannot be used as a single local path component
    #[error("Refusing to use '{label}' as a local path component")]
    UnsafePath { label: String },
}

impl DownloadError {
    /// Wrap an I/O error with the path it occurred on
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DownloadError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found; a default one was written in its place
    #[error("Config file not found, wrote default values to {path}")]
    DefaultWritten { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Default configuration could not be serialized
    #[error("Failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    /// Credentials missing from the configuration
    #[error("Config file requires api_key and api_secret")]
    MissingCredentials,

    /// Credentials still hold the generated placeholder values
    #[error("Default values found, update the config file with your api key and secret")]
    DefaultCredentials,

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// I/O error reading or writing the configuration file
    #[error("Failed to access configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Worker pool errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Invalid worker configuration
    #[error("Invalid worker configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Worker task panicked or was cancelled
    #[error("Worker {worker_id} terminated unexpectedly")]
    WorkerPanic { worker_id: usize },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Worker pool error
    #[error(transparent)]
    Worker(#[from] WorkerError),

    /// Filters produced an empty result set
    #[error("No matching extracts found, please check your filters and try again")]
    NoMatchingFiles,

    /// Date filter could not be parsed
    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Catalog(_) => "catalog",
            AppError::Download(_) => "download",
            AppError::Config(_) => "config",
            AppError::Worker(_) => "worker",
            AppError::NoMatchingFiles => "filter",
            AppError::InvalidDate { .. } => "filter",
            AppError::Io(_) => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Worker result type alias
pub type WorkerResult<T> = std::result::Result<T, WorkerError>;
