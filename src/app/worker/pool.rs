//! Worker pool management and coordination
//!
//! The pool pre-loads one bounded queue with every task, closes it, and lets
//! N workers drain it concurrently. Outcomes flow back through a single result
//! channel that is only read once every worker has exited.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::config::WorkerConfig;
use super::core::DownloadWorker;
use super::types::{DownloadOutcome, DownloadSummary, DownloadTask, WorkerEvent};
use crate::app::client::ExtractClient;
use crate::errors::{WorkerError, WorkerResult};

/// Outcomes and counts of a finished run
#[derive(Debug, Default)]
pub struct PoolReport {
    /// One outcome per submitted task, in completion order
    pub outcomes: Vec<DownloadOutcome>,
    pub summary: DownloadSummary,
}

/// Pool for running download workers over a fixed task list
#[derive(Debug)]
pub struct WorkerPool {
    config: Arc<WorkerConfig>,
    client: Arc<ExtractClient>,
}

impl WorkerPool {
    pub fn new(config: WorkerConfig, client: Arc<ExtractClient>) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Download every task and wait for all workers to finish
    ///
    /// `events` receives started/finished notifications for progress display.
    ///
    /// # Errors
    ///
    /// Returns `WorkerError` if the configuration is invalid or a worker task
    /// dies. Per-file failures are reported in the outcomes instead.
    pub async fn run(
        &self,
        tasks: Vec<DownloadTask>,
        events: Option<mpsc::UnboundedSender<WorkerEvent>>,
    ) -> WorkerResult<PoolReport> {
        self.config.validate()?;

        if tasks.is_empty() {
            return Ok(PoolReport::default());
        }

        let total = tasks.len();
        let worker_count = self.config.effective_worker_count().min(total);
        debug!("Starting {} workers for {} files", worker_count, total);

        let (task_tx, task_rx) = mpsc::channel(total);
        let (result_tx, mut result_rx) = mpsc::channel(total);

        // Capacity equals the task count and the receiver is still held here
        for task in tasks {
            let _ = task_tx.try_send(task);
        }
        drop(task_tx);

        let queue = Arc::new(Mutex::new(task_rx));
        let handles: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                let worker = DownloadWorker::new(
                    worker_id,
                    self.config.clone(),
                    self.client.clone(),
                    events.clone(),
                );
                tokio::spawn(worker.run(queue.clone(), result_tx.clone()))
            })
            .collect();
        drop(result_tx);

        for (worker_id, handle) in handles.into_iter().enumerate() {
            if handle.await.is_err() {
                return Err(WorkerError::WorkerPanic { worker_id });
            }
        }
        debug!("All workers exited");

        let mut report = PoolReport {
            outcomes: Vec::with_capacity(total),
            summary: DownloadSummary::default(),
        };
        while let Some(outcome) = result_rx.recv().await {
            report.summary.record(&outcome);
            report.outcomes.push(outcome);
        }

        debug!("{}", report.summary);
        Ok(report)
    }
}
