//! Data models for Extract Fetcher
//!
//! This module defines the catalog tree (`CatalogEntry`), the dataset naming
//! rules applied to file entries, and the `MatchedFile` records produced by
//! the filter engine.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::catalog::{DATE_MARKER, HEADERS_MARKER};

/// Kind of a catalog node as reported by the listing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Directory that can be listed recursively
    #[serde(rename = "dir")]
    Directory,
    /// Downloadable file
    #[serde(rename = "file")]
    File,
    /// Any other type the service may report; never indexed
    #[serde(other)]
    Other,
}

/// One node of the remote catalog tree
///
/// Entries deserialize straight from a listing response. The remaining fields
/// are derived while indexing: a directory owns its retained `children` and
/// indexes them by dataset name, and every retained node carries the group
/// labels of the directory it lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name (e.g., "android_2022-05-01.zip")
    pub name: String,
    /// Request path for directories, download URL for files
    pub url: String,
    /// Directory or file
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Modification time in epoch milliseconds
    #[serde(rename = "mtime", default)]
    pub modified_at_millis: i64,
    /// Size in bytes
    #[serde(rename = "size", default)]
    pub size_bytes: u64,
    #[serde(skip)]
    groups: Vec<String>,
    #[serde(skip)]
    children: Vec<CatalogEntry>,
    /// Dataset name -> indices into `children`, in listing order
    #[serde(skip)]
    datasets_by_name: HashMap<String, Vec<usize>>,
    /// Dataset name -> index into `children` of the newest file
    #[serde(skip)]
    latest_by_name: HashMap<String, usize>,
}

impl CatalogEntry {
    /// Create a bare directory entry
    pub fn directory(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(name, url, EntryKind::Directory, 0, 0)
    }

    /// Create a bare file entry
    pub fn file(
        name: impl Into<String>,
        url: impl Into<String>,
        modified_at_millis: i64,
        size_bytes: u64,
    ) -> Self {
        Self::new(name, url, EntryKind::File, modified_at_millis, size_bytes)
    }

    fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        kind: EntryKind,
        modified_at_millis: i64,
        size_bytes: u64,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind,
            modified_at_millis,
            size_bytes,
            groups: Vec::new(),
            children: Vec::new(),
            datasets_by_name: HashMap::new(),
            latest_by_name: HashMap::new(),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// A dataset file is a dated file that is not a column header file
    pub fn is_dataset(&self) -> bool {
        self.kind == EntryKind::File
            && !self.name.contains(HEADERS_MARKER)
            && self.name.contains(DATE_MARKER)
    }

    /// Dataset name: the file name up to the first date marker
    ///
    /// Returns `None` for names without a date marker.
    pub fn dataset_name(&self) -> Option<&str> {
        self.name
            .find(DATE_MARKER)
            .map(|index| &self.name[..index])
    }

    /// Modification time as a UTC timestamp
    pub fn modified_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.modified_at_millis).unwrap_or_default()
    }

    /// Path-segment labels locating this entry in the catalog
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Retained sub-directories and dataset files (directories only)
    pub fn children(&self) -> &[CatalogEntry] {
        &self.children
    }

    /// Child directories of this entry
    pub fn subdirectories(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.children.iter().filter(|child| child.is_directory())
    }

    /// Dataset names indexed in this directory, in no particular order
    pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
        self.datasets_by_name.keys().map(String::as_str)
    }

    /// Files of one dataset in listing order, paired with their child index
    pub fn dataset_files(&self, dataset: &str) -> Vec<(usize, &CatalogEntry)> {
        self.datasets_by_name
            .get(dataset)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&index| (index, &self.children[index]))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Newest file of a dataset in this directory
    pub fn latest(&self, dataset: &str) -> Option<&CatalogEntry> {
        self.latest_by_name
            .get(dataset)
            .map(|&index| &self.children[index])
    }

    /// Whether the child at `index` is the newest file of `dataset`
    pub fn is_latest_child(&self, dataset: &str, index: usize) -> bool {
        self.latest_by_name.get(dataset) == Some(&index)
    }

    /// Assign groups from the trimmed slash-split of this entry's URL,
    /// unless groups were already assigned
    pub(crate) fn assign_groups_from_url(&mut self) {
        if self.groups.is_empty() {
            self.groups = group_labels(&self.url);
        }
    }

    pub(crate) fn set_groups(&mut self, groups: Vec<String>) {
        self.groups = groups;
    }

    /// Install the retained children and their dataset index
    pub(crate) fn set_index(
        &mut self,
        children: Vec<CatalogEntry>,
        datasets_by_name: HashMap<String, Vec<usize>>,
        latest_by_name: HashMap<String, usize>,
    ) {
        self.children = children;
        self.datasets_by_name = datasets_by_name;
        self.latest_by_name = latest_by_name;
    }
}

/// Split a catalog path into group labels ("/a/b/" -> ["a", "b"])
pub fn group_labels(url: &str) -> Vec<String> {
    url.trim_matches('/').split('/').map(str::to_string).collect()
}

/// A dataset file selected by the filter engine
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedFile<'a> {
    /// Dataset the file belongs to
    pub dataset: &'a str,
    /// File name
    pub name: &'a str,
    /// Whether this is the newest file of its dataset in its directory
    pub latest: bool,
    /// Modification time of the file
    pub updated: DateTime<Utc>,
    /// Catalog entry the match was taken from
    pub entry: &'a CatalogEntry,
}

impl<'a> MatchedFile<'a> {
    /// Group labels of the matched file
    pub fn groups(&self) -> &'a [String] {
        self.entry.groups()
    }
}
