//! Command-line argument parsing for Extract Fetcher
//!
//! This module defines the CLI structure using clap derive macros. Filter
//! flags are global so they apply to both listing and downloading.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::filter::{parse_list, parse_since, FilterCriteria};
use crate::constants::{catalog, workers};
use crate::errors::Result;

/// Extract Fetcher - mirror data extracts from a remote catalog
#[derive(Parser, Debug)]
#[command(
    name = "extract_fetcher",
    version,
    about = "List and download data extract files",
    long_about = "Lists the extract catalog available to your account, filters it by group, dataset, \
file name or date, and mirrors the selected files to local storage."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show all versions of each dataset, not just the latest
    #[arg(long, global = true)]
    pub all: bool,

    /// Only include these groups (comma-delimited)
    #[arg(long, global = true, value_name = "GROUPS")]
    pub filter_groups: Option<String>,

    /// Only include these datasets (comma-delimited)
    #[arg(long, global = true, value_name = "DATASETS")]
    pub filter_datasets: Option<String>,

    /// Only include these file names (comma-delimited)
    #[arg(long, global = true, value_name = "FILENAMES")]
    pub filter_filenames: Option<String>,

    /// Only include files updated on or after this date (YYYY-MM-DD); implies --all
    #[arg(long, global = true, value_name = "DATE")]
    pub since: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available extract files
    List,

    /// Download extract files
    Download(DownloadArgs),
}

/// Arguments for the download command
#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Download files even if they already exist locally
    #[arg(long)]
    pub overwrite_existing: bool,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub confirm: bool,

    /// Store files below group and dataset directories
    #[arg(long)]
    pub use_file_hierarchy: bool,

    /// Number of concurrent downloads
    #[arg(long, default_value_t = workers::DEFAULT_WORKER_COUNT)]
    pub concurrency: usize,
}

impl Default for DownloadArgs {
    fn default() -> Self {
        Self {
            overwrite_existing: false,
            confirm: false,
            use_file_hierarchy: false,
            concurrency: workers::DEFAULT_WORKER_COUNT,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

impl GlobalArgs {
    /// Build filter criteria from the filter flags
    ///
    /// File names also match with the archive extension appended.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidDate` if `--since` is not a valid date
    pub fn filter_criteria(&self) -> Result<FilterCriteria> {
        let since = self.since.as_deref().map(parse_since).transpose()?;
        let list = |value: &Option<String>| value.as_deref().map(parse_list).unwrap_or_default();

        Ok(FilterCriteria::new()
            .with_groups(list(&self.filter_groups))
            .with_datasets(list(&self.filter_datasets))
            .with_filenames(list(&self.filter_filenames))
            .with_filename_extension_fallback(catalog::FILENAME_EXTENSION)
            .with_since(since)
            .with_latest_only(!self.all))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_download_flags() {
        let cli = Cli::try_parse_from([
            "extract_fetcher",
            "--filter-groups",
            "android,web",
            "download",
            "--concurrency",
            "4",
            "--use-file-hierarchy",
            "-v",
        ])
        .unwrap();

        assert!(cli.global.verbose);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
        match cli.command {
            Commands::Download(args) => {
                assert_eq!(args.concurrency, 4);
                assert!(args.use_file_hierarchy);
                assert!(!args.confirm);
                assert!(!args.overwrite_existing);
            }
            Commands::List => panic!("expected download command"),
        }
    }

    #[test]
    fn test_default_concurrency() {
        let cli = Cli::try_parse_from(["extract_fetcher", "download"]).unwrap();
        match cli.command {
            Commands::Download(args) => assert_eq!(args.concurrency, 1),
            Commands::List => panic!("expected download command"),
        }
    }

    #[test]
    fn test_filter_criteria() {
        let cli = Cli::try_parse_from([
            "extract_fetcher",
            "list",
            "--filter-datasets",
            "ios_cell",
            "--filter-filenames",
            "ios_cell_2022-05-01",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::List));

        let criteria = cli.global.filter_criteria().unwrap();
        assert!(criteria.latest_only());
        assert!(criteria.datasets.contains("ios_cell"));
        assert!(criteria.filenames.contains("ios_cell_2022-05-01"));
        assert!(criteria.filenames.contains("ios_cell_2022-05-01.zip"));
        assert!(criteria.groups.is_empty());
    }

    #[test]
    fn test_since_implies_all_versions() {
        let args = GlobalArgs {
            since: Some("2022-05-01".to_string()),
            ..Default::default()
        };
        let criteria = args.filter_criteria().unwrap();
        assert!(!criteria.latest_only());
        assert!(criteria.since.is_some());

        let invalid = GlobalArgs {
            since: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            invalid.filter_criteria(),
            Err(AppError::InvalidDate { .. })
        ));
    }
}
