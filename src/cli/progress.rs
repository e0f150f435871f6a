//! Download progress display
//!
//! A single `indicatif` bar counts finished files. Worker events arrive on an
//! unbounded channel and are applied by a background task, so workers never
//! wait on the terminal.

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::worker::{DownloadState, WorkerEvent};

const BAR_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress bar driven by worker events
pub struct DownloadProgress {
    bar: ProgressBar,
    update_task: JoinHandle<FileCounts>,
}

/// Per-state tallies seen by the progress display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileCounts {
    pub started: usize,
    pub finished: usize,
    pub failed: usize,
}

impl DownloadProgress {
    /// Start displaying progress for `total_files`, consuming `events`
    /// until every sender is dropped
    pub fn start(total_files: usize, events: mpsc::UnboundedReceiver<WorkerEvent>) -> Self {
        Self::with_bar(ProgressBar::new(total_files as u64), events)
    }

    /// Same as `start` but never draws; used when output is not interactive
    pub fn hidden(total_files: usize, events: mpsc::UnboundedReceiver<WorkerEvent>) -> Self {
        Self::with_bar(ProgressBar::hidden(), events).with_length(total_files)
    }

    fn with_bar(bar: ProgressBar, events: mpsc::UnboundedReceiver<WorkerEvent>) -> Self {
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        bar.set_style(style);

        let update_task = tokio::spawn(apply_events(bar.clone(), events));
        Self { bar, update_task }
    }

    fn with_length(self, total_files: usize) -> Self {
        self.bar.set_length(total_files as u64);
        self
    }

    /// Wait for the event stream to end and close the bar
    pub async fn finish(self) -> FileCounts {
        let counts = self.update_task.await.unwrap_or_default();
        self.bar.finish_with_message("done");
        debug!("Progress closed after {} files", counts.finished);
        counts
    }
}

async fn apply_events(
    bar: ProgressBar,
    mut events: mpsc::UnboundedReceiver<WorkerEvent>,
) -> FileCounts {
    let mut counts = FileCounts::default();

    while let Some(event) = events.recv().await {
        match event {
            WorkerEvent::Started { file_name, .. } => {
                counts.started += 1;
                bar.set_message(file_name);
            }
            WorkerEvent::Finished {
                file_name, state, ..
            } => {
                counts.finished += 1;
                if state.is_error() {
                    counts.failed += 1;
                    bar.println(format!("{}: {}", state.label(), file_name));
                } else if state == DownloadState::Skipped {
                    bar.set_message(format!("{file_name} exists"));
                }
                bar.inc(1);
            }
        }
    }

    counts
}
