//! Worker type definitions
//!
//! Tasks handed to the pool, the per-file terminal states and outcomes
//! workers report back, progress events for the CLI, and the aggregated run
//! summary.

use std::path::PathBuf;

use crate::app::models::MatchedFile;
use crate::errors::DownloadError;

/// One file to mirror, detached from the catalog it was selected from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// File name, also the local file name
    pub name: String,
    /// Download URL as listed in the catalog
    pub url: String,
    /// Expected size in bytes
    pub size_bytes: u64,
    /// Group labels of the containing directory
    pub groups: Vec<String>,
    /// Dataset the file belongs to
    pub dataset: String,
}

impl From<&MatchedFile<'_>> for DownloadTask {
    fn from(matched: &MatchedFile<'_>) -> Self {
        Self {
            name: matched.name.to_string(),
            url: matched.entry.url.clone(),
            size_bytes: matched.entry.size_bytes,
            groups: matched.groups().to_vec(),
            dataset: matched.dataset.to_string(),
        }
    }
}

/// Terminal state of a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadState {
    /// File already present and overwriting is off; no request made
    Skipped,
    /// Downloaded and the on-disk size matches the catalog
    Verified,
    /// Downloaded but the on-disk size differs; file left in place
    SizeMismatch,
    /// Request, stream or write failed
    TransportFailed,
    /// Destination directory could not be created
    DirectoryFailed,
}

impl DownloadState {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::SizeMismatch | Self::TransportFailed | Self::DirectoryFailed
        )
    }

    /// Short label for progress and log output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Verified => "downloaded",
            Self::SizeMismatch => "size mismatch",
            Self::TransportFailed => "failed",
            Self::DirectoryFailed => "directory error",
        }
    }
}

/// Result reported by a worker for one task
#[derive(Debug)]
pub struct DownloadOutcome {
    pub file_name: String,
    pub state: DownloadState,
    /// True only for a verified download
    pub success: bool,
    pub error: Option<DownloadError>,
    /// Local path the file was (or would have been) written to
    pub destination: PathBuf,
}

impl DownloadOutcome {
    pub fn skipped(file_name: impl Into<String>, destination: PathBuf) -> Self {
        Self {
            file_name: file_name.into(),
            state: DownloadState::Skipped,
            success: false,
            error: None,
            destination,
        }
    }

    pub fn verified(file_name: impl Into<String>, destination: PathBuf) -> Self {
        Self {
            file_name: file_name.into(),
            state: DownloadState::Verified,
            success: true,
            error: None,
            destination,
        }
    }

    pub fn failed(
        file_name: impl Into<String>,
        state: DownloadState,
        error: DownloadError,
        destination: PathBuf,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            state,
            success: false,
            error: Some(error),
            destination,
        }
    }
}

/// Progress notification emitted by workers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Started { worker_id: usize, file_name: String },
    Finished {
        worker_id: usize,
        file_name: String,
        state: DownloadState,
    },
}

/// Counts aggregated over every outcome of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub errored: usize,
}

impl DownloadSummary {
    /// Count one outcome: errors first, then successes, everything else is a skip
    pub fn record(&mut self, outcome: &DownloadOutcome) {
        if outcome.error.is_some() {
            self.errored += 1;
        } else if outcome.success {
            self.downloaded += 1;
        } else {
            self.skipped += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.errored
    }
}

impl std::fmt::Display for DownloadSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Downloaded {} file(s), skipped {} existing file(s), encountered {} error(s)",
            self.downloaded, self.skipped, self.errored
        )
    }
}
