//! Worker configuration management
//!
//! Pool size, local storage layout and overwrite policy for a download run.

use std::path::{Component, Path, PathBuf};

use crate::constants::{files, workers};
use crate::errors::{DownloadError, DownloadResult, WorkerError, WorkerResult};

use super::types::DownloadTask;

/// Configuration for the download pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Number of concurrent workers to spawn (0 is treated as 1)
    pub worker_count: usize,
    /// Root directory files are mirrored into
    pub storage_root: PathBuf,
    /// Re-download files that already exist locally
    pub overwrite_existing: bool,
    /// Mirror the catalog layout (groups, then dataset) below the root
    pub use_file_hierarchy: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            worker_count: workers::DEFAULT_WORKER_COUNT,
            storage_root: PathBuf::from(files::STORAGE_DIRECTORY),
            overwrite_existing: false,
            use_file_hierarchy: false,
        }
    }
}

impl WorkerConfig {
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Default::default()
        }
    }

    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_overwrite_existing(mut self, overwrite: bool) -> Self {
        self.overwrite_existing = overwrite;
        self
    }

    pub fn with_file_hierarchy(mut self, use_file_hierarchy: bool) -> Self {
        self.use_file_hierarchy = use_file_hierarchy;
        self
    }

    /// Number of workers actually spawned
    pub fn effective_worker_count(&self) -> usize {
        self.worker_count.max(1)
    }

    /// Validate configuration values and return errors for invalid settings
    pub fn validate(&self) -> WorkerResult<()> {
        if self.storage_root.as_os_str().is_empty() {
            return Err(WorkerError::InvalidConfig {
                reason: "storage directory cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Local directory a task's file is written into
    ///
    /// # Errors
    ///
    /// Returns `DownloadError::UnsafePath` if a group label or the dataset name
    /// would leave the storage root.
    pub fn destination_dir(&self, task: &DownloadTask) -> DownloadResult<PathBuf> {
        let mut dir = self.storage_root.clone();
        if !self.use_file_hierarchy {
            return Ok(dir);
        }

        for group in &task.groups {
            dir.push(single_component(group)?);
        }
        dir.push(single_component(&task.dataset)?);
        Ok(dir)
    }

    /// Full local path of a task's file, always below the storage root
    pub fn destination_path(&self, task: &DownloadTask) -> DownloadResult<PathBuf> {
        let dir = self.destination_dir(task)?;
        Ok(dir.join(single_component(&task.name)?))
    }

    pub fn storage_root(&self) -> &Path {
        &self.storage_root
    }
}

/// Accept `label` only if it is exactly one normal path component
fn single_component(label: &str) -> DownloadResult<&Path> {
    let path = Path::new(label);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(DownloadError::UnsafePath {
            label: label.to_string(),
        }),
    }
}
