//! Command handlers for Extract Fetcher CLI
//!
//! Both commands share one pipeline: load configuration, build the catalog
//! (through the listing cache), apply the filters. `list` then prints the
//! matches; `download` confirms and hands them to the worker pool.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::worker::{DownloadTask, WorkerConfig, WorkerPool};
use crate::app::{
    filter_files, sort_matches, Catalog, CatalogIndexer, ExtractClient, FilterCriteria,
    MatchedFile, SnapshotCache,
};
use crate::cli::{confirm_download, render_table, DownloadArgs, DownloadProgress, GlobalArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Everything a command needs after the catalog has been built
struct Session {
    config: AppConfig,
    client: Arc<ExtractClient>,
    catalog: Catalog,
    criteria: FilterCriteria,
}

impl Session {
    /// Load configuration and build the catalog
    async fn open(global: &GlobalArgs) -> Result<Self> {
        // Reject bad filter values before touching the network
        let criteria = global.filter_criteria()?;
        debug!("Filter criteria: {:?}", criteria);

        let config = AppConfig::load(global.config.clone()).await?;
        debug!(
            "Config values: extract_url={}, storage_directory={}, cache_duration_minutes={}, cache_filename={}",
            config.api.extract_url,
            config.storage.storage_directory.display(),
            config.cache.cache_duration_minutes,
            config.cache.cache_filename.display()
        );

        let (client_config, cache_config) = config.to_runtime_config();
        let client = Arc::new(ExtractClient::new(client_config)?);

        let start = Instant::now();
        let mut cache = SnapshotCache::open(cache_config).await;
        let catalog = CatalogIndexer::new(&client, &mut cache).build().await?;
        cache.persist().await;
        debug!("Catalog ready in {:?}", start.elapsed());

        Ok(Self {
            config,
            client,
            catalog,
            criteria,
        })
    }

    /// Filtered matches in display order
    fn matches(&self) -> Result<Vec<MatchedFile<'_>>> {
        let mut matches = filter_files(self.catalog.entries(), &self.criteria);
        if matches.is_empty() {
            return Err(AppError::NoMatchingFiles);
        }
        sort_matches(&mut matches);
        Ok(matches)
    }
}

/// Handle the list command
pub async fn handle_list(global: GlobalArgs) -> Result<()> {
    let session = Session::open(&global).await?;
    let matches = session.matches()?;

    print!("{}", render_table(&matches));
    Ok(())
}

/// Handle the download command
///
/// # Errors
///
/// Returns `AppError` if configuration, catalog building or the worker pool
/// fail. Individual file failures are counted in the summary instead.
pub async fn handle_download(global: GlobalArgs, args: DownloadArgs) -> Result<()> {
    let session = Session::open(&global).await?;
    let matches = session.matches()?;
    info!("Found {} file(s)", matches.len());
    debug!(
        "Download flags: overwrite_existing={}, confirm={}, use_file_hierarchy={}, concurrency={}",
        args.overwrite_existing, args.confirm, args.use_file_hierarchy, args.concurrency
    );

    if !args.confirm && !confirm_download(&matches)? {
        info!("Download cancelled");
        return Ok(());
    }

    let tasks: Vec<DownloadTask> = matches.iter().map(DownloadTask::from).collect();
    let worker_config = WorkerConfig::new(session.config.storage_directory())
        .with_worker_count(args.concurrency)
        .with_overwrite_existing(args.overwrite_existing)
        .with_file_hierarchy(args.use_file_hierarchy);
    let pool = WorkerPool::new(worker_config, session.client.clone());

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let progress = if std::io::stderr().is_terminal() {
        DownloadProgress::start(tasks.len(), events_rx)
    } else {
        DownloadProgress::hidden(tasks.len(), events_rx)
    };

    let start = Instant::now();
    let report = pool.run(tasks, Some(events_tx)).await;
    progress.finish().await;
    let report = report?;

    debug!(
        "Processed {} file(s) in {:?}",
        report.summary.total(),
        start.elapsed()
    );
    println!("{}", report.summary);
    Ok(())
}
