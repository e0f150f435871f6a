//! Core download worker implementation
//!
//! A worker pulls tasks from the shared queue until it is closed and drained,
//! drives each file to exactly one terminal state, and reports the outcome on
//! the result channel. Per-file failures are reported, never propagated.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error};

use super::config::WorkerConfig;
use super::types::{DownloadOutcome, DownloadState, DownloadTask, WorkerEvent};
use crate::app::client::ExtractClient;
use crate::errors::{DownloadError, DownloadResult};

/// Shared receiving end of the task queue
pub type TaskQueue = Arc<Mutex<mpsc::Receiver<DownloadTask>>>;

/// Individual download worker
#[derive(Debug)]
pub struct DownloadWorker {
    /// Unique worker identifier
    id: usize,
    config: Arc<WorkerConfig>,
    client: Arc<ExtractClient>,
    events: Option<mpsc::UnboundedSender<WorkerEvent>>,
}

impl DownloadWorker {
    pub fn new(
        id: usize,
        config: Arc<WorkerConfig>,
        client: Arc<ExtractClient>,
        events: Option<mpsc::UnboundedSender<WorkerEvent>>,
    ) -> Self {
        Self {
            id,
            config,
            client,
            events,
        }
    }

    /// Consume tasks until the queue is closed and empty
    pub async fn run(self, queue: TaskQueue, results: mpsc::Sender<DownloadOutcome>) {
        debug!("Worker {} starting", self.id);
        let mut processed = 0usize;

        loop {
            let task = queue.lock().await.recv().await;
            let Some(task) = task else {
                break;
            };

            self.emit(WorkerEvent::Started {
                worker_id: self.id,
                file_name: task.name.clone(),
            });

            let outcome = self.process(&task).await;
            processed += 1;

            self.emit(WorkerEvent::Finished {
                worker_id: self.id,
                file_name: outcome.file_name.clone(),
                state: outcome.state,
            });

            if results.send(outcome).await.is_err() {
                debug!("Worker {} result channel closed", self.id);
                break;
            }
        }

        debug!("Worker {} finished after {} files", self.id, processed);
    }

    fn emit(&self, event: WorkerEvent) {
        if let Some(events) = &self.events {
            // Progress is best effort; a dropped receiver is not an error
            let _ = events.send(event);
        }
    }

    /// Drive one task to its terminal state
    pub async fn process(&self, task: &DownloadTask) -> DownloadOutcome {
        let placed = self.config.destination_dir(task).and_then(|dir| {
            let file = self.config.destination_path(task)?;
            Ok((dir, file))
        });
        let (directory, destination) = match placed {
            Ok(paths) => paths,
            Err(e) => {
                error!("Unable to place {}: {}", task.name, e);
                let root = self.config.storage_root().to_path_buf();
                return DownloadOutcome::failed(&task.name, DownloadState::DirectoryFailed, e, root);
            }
        };

        if let Err(e) = create_directory_chain(self.config.storage_root(), &directory).await {
            error!("Unable to create {}: {}", directory.display(), e);
            return DownloadOutcome::failed(&task.name, DownloadState::DirectoryFailed, e, destination);
        }

        if !self.config.overwrite_existing && tokio::fs::metadata(&destination).await.is_ok() {
            debug!("Skipping {}, file exists", task.name);
            return DownloadOutcome::skipped(&task.name, destination);
        }

        debug!("Downloading {} to {}", task.name, destination.display());
        if let Err(e) = self.client.download_file(&task.url, &destination).await {
            error!("Failed to download {}: {}", task.name, e);
            return DownloadOutcome::failed(&task.name, DownloadState::TransportFailed, e, destination);
        }

        match verify_size(task, &destination).await {
            Ok(()) => {
                debug!("Verified {} ({} bytes)", task.name, task.size_bytes);
                DownloadOutcome::verified(&task.name, destination)
            }
            Err(e @ DownloadError::SizeMismatch { .. }) => {
                error!("{}", e);
                DownloadOutcome::failed(&task.name, DownloadState::SizeMismatch, e, destination)
            }
            Err(e) => {
                error!("Unable to stat {}: {}", destination.display(), e);
                DownloadOutcome::failed(&task.name, DownloadState::TransportFailed, e, destination)
            }
        }
    }
}

/// Create every directory from `root` down to `directory`
///
/// Each component, the root's own included, is created individually with
/// owner-only permissions. A component that already exists, including one
/// created concurrently by another worker, counts as success.
pub async fn create_directory_chain(root: &Path, directory: &Path) -> DownloadResult<()> {
    let relative = directory.strip_prefix(root).unwrap_or(directory);
    let mut current = PathBuf::new();
    for component in root.components().chain(relative.components()) {
        current.push(component);
        create_single_directory(&current).await?;
    }
    Ok(())
}

async fn create_single_directory(path: &Path) -> DownloadResult<()> {
    if tokio::fs::metadata(path).await.map(|m| m.is_dir()).unwrap_or(false) {
        return Ok(());
    }

    let mut builder = tokio::fs::DirBuilder::new();
    #[cfg(unix)]
    builder.mode(crate::constants::files::DIRECTORY_PERMISSIONS);

    match builder.create(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(DownloadError::filesystem(path, e)),
    }
}

async fn verify_size(task: &DownloadTask, destination: &Path) -> DownloadResult<()> {
    let metadata = tokio::fs::metadata(destination)
        .await
        .map_err(|e| DownloadError::filesystem(destination, e))?;

    if metadata.len() != task.size_bytes {
        return Err(DownloadError::SizeMismatch {
            file_name: task.name.clone(),
            expected: task.size_bytes,
            actual: metadata.len(),
        });
    }
    Ok(())
}
