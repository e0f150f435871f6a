//! Filter engine
//!
//! Selects dataset files from an indexed catalog by group, dataset name, file
//! name, recency cutoff and latest-only. Filtering is pure and synchronous;
//! the matches borrow from the catalog they were taken from.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};

use crate::app::models::{CatalogEntry, MatchedFile};
use crate::constants::catalog::SINCE_FORMAT;
use crate::errors::{AppError, Result};

/// Selection criteria applied to every dataset file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Group labels, any of which must be carried by a file's directory
    pub groups: HashSet<String>,
    /// Dataset names to keep
    pub datasets: HashSet<String>,
    /// Literal file names to keep
    pub filenames: HashSet<String>,
    /// Files updated before this instant are dropped
    pub since: Option<DateTime<Utc>>,
    latest_only: bool,
}

impl FilterCriteria {
    /// Criteria matching every dataset file, all versions
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups(mut self, groups: impl IntoIterator<Item = String>) -> Self {
        self.groups = groups.into_iter().collect();
        self
    }

    pub fn with_datasets(mut self, datasets: impl IntoIterator<Item = String>) -> Self {
        self.datasets = datasets.into_iter().collect();
        self
    }

    pub fn with_filenames(mut self, filenames: impl IntoIterator<Item = String>) -> Self {
        self.filenames = filenames.into_iter().collect();
        self
    }

    /// Also accept every filename with `extension` appended
    pub fn with_filename_extension_fallback(mut self, extension: &str) -> Self {
        let qualified: Vec<String> = self
            .filenames
            .iter()
            .map(|name| format!("{name}{extension}"))
            .collect();
        self.filenames.extend(qualified);
        self
    }

    pub fn with_since(mut self, since: Option<DateTime<Utc>>) -> Self {
        self.since = since;
        self
    }

    pub fn with_latest_only(mut self, latest_only: bool) -> Self {
        self.latest_only = latest_only;
        self
    }

    /// Latest-only is switched off whenever a cutoff is set
    pub fn latest_only(&self) -> bool {
        self.latest_only && self.since.is_none()
    }

    fn matches_groups(&self, directory: &CatalogEntry) -> bool {
        self.groups.is_empty() || directory.groups().iter().any(|g| self.groups.contains(g))
    }

    fn matches_file(&self, dataset: &str, file: &CatalogEntry, latest: bool) -> bool {
        (self.filenames.is_empty() || self.filenames.contains(&file.name))
            && (self.datasets.is_empty() || self.datasets.contains(dataset))
            && (!self.latest_only() || latest)
            && self.since.map_or(true, |since| file.modified_at() >= since)
    }
}

/// Split a comma-delimited CLI value into trimmed, non-empty items
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a `YYYY-MM-DD` cutoff as UTC midnight of that day
///
/// # Errors
///
/// Returns `AppError::InvalidDate` if the value is not a calendar date
pub fn parse_since(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, SINCE_FORMAT).map_err(|source| {
        AppError::InvalidDate {
            value: value.to_string(),
            source,
        }
    })?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}

/// Select matching dataset files from the root entries of a catalog
///
/// Directories are visited in pre-order: a directory's own matches come
/// before those of its sub-directories. Sub-directories are visited whether
/// or not their parent matched the group filter.
pub fn filter_files<'a>(entries: &'a [CatalogEntry], criteria: &FilterCriteria) -> Vec<MatchedFile<'a>> {
    let mut matches = Vec::new();
    for directory in entries.iter().filter(|entry| entry.is_directory()) {
        visit_directory(directory, criteria, &mut matches);
    }
    matches
}

fn visit_directory<'a>(
    directory: &'a CatalogEntry,
    criteria: &FilterCriteria,
    matches: &mut Vec<MatchedFile<'a>>,
) {
    if criteria.matches_groups(directory) {
        for dataset in directory.dataset_names() {
            for (index, file) in directory.dataset_files(dataset) {
                let latest = directory.is_latest_child(dataset, index);
                if criteria.matches_file(dataset, file, latest) {
                    matches.push(MatchedFile {
                        dataset,
                        name: &file.name,
                        latest,
                        updated: file.modified_at(),
                        entry: file,
                    });
                }
            }
        }
    }

    for child in directory.subdirectories() {
        visit_directory(child, criteria, matches);
    }
}

/// Order matches by dataset name, then file name
pub fn sort_matches(matches: &mut [MatchedFile<'_>]) {
    matches.sort_by(|a, b| a.dataset.cmp(b.dataset).then_with(|| a.name.cmp(b.name)));
}
