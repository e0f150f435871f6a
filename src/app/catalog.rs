//! Catalog indexer
//!
//! Builds the in-memory catalog tree by walking the remote listing depth
//! first. Every level is looked up in the snapshot cache before a request is
//! made, and every listing actually fetched is recorded back into it.
//!
//! Traversal is sequential: a sub-directory's subtree is fully indexed before
//! the next sibling is requested. Any failure at any depth aborts the build.

use std::collections::HashMap;

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, info};

use crate::app::cache::SnapshotCache;
use crate::app::client::ExtractClient;
use crate::app::models::CatalogEntry;
use crate::errors::CatalogResult;

/// Root of an indexed catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Wrap already indexed root entries
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Retained root entries
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Every directory in the tree, in pre-order
    pub fn directories(&self) -> Vec<&CatalogEntry> {
        fn visit<'a>(entry: &'a CatalogEntry, out: &mut Vec<&'a CatalogEntry>) {
            out.push(entry);
            for child in entry.subdirectories() {
                visit(child, out);
            }
        }

        let mut directories = Vec::new();
        for entry in self.entries.iter().filter(|e| e.is_directory()) {
            visit(entry, &mut directories);
        }
        directories
    }

    /// Number of dataset files indexed below directories
    pub fn dataset_file_count(&self) -> usize {
        self.directories()
            .into_iter()
            .map(|dir| dir.children().iter().filter(|c| c.is_dataset()).count())
            .sum()
    }
}

/// Depth-first catalog builder
pub struct CatalogIndexer<'a> {
    client: &'a ExtractClient,
    cache: &'a mut SnapshotCache,
}

impl<'a> CatalogIndexer<'a> {
    pub fn new(client: &'a ExtractClient, cache: &'a mut SnapshotCache) -> Self {
        Self { client, cache }
    }

    /// Fetch and index the whole catalog starting at the root listing
    ///
    /// # Errors
    ///
    /// Returns the first `CatalogError` hit at any depth; nothing partial is
    /// returned.
    pub async fn build(mut self) -> CatalogResult<Catalog> {
        let listing = self.fetch_level("").await?;
        let entries = self.index_listing(listing).await?;

        // Root-level files carry no groups and are kept only if they are datasets
        let entries: Vec<CatalogEntry> = entries
            .into_iter()
            .filter(|entry| entry.is_directory() || entry.is_dataset())
            .collect();

        let catalog = Catalog::from_entries(entries);
        info!(
            "Indexed {} directories and {} dataset files",
            catalog.directories().len(),
            catalog.dataset_file_count()
        );
        Ok(catalog)
    }

    /// Cached or freshly fetched listing for one catalog path
    async fn fetch_level(&mut self, path: &str) -> CatalogResult<Vec<CatalogEntry>> {
        let url = self.client.listing_url(path);
        if let Some(listing) = self.cache.load(&url) {
            return Ok(listing);
        }

        let listing = self.client.fetch_listing(path).await?;
        self.cache.record(&url, &listing);
        Ok(listing)
    }

    /// Index every directory in `listing`, leaving file entries untouched
    fn index_listing(
        &mut self,
        listing: Vec<CatalogEntry>,
    ) -> BoxFuture<'_, CatalogResult<Vec<CatalogEntry>>> {
        async move {
            let mut entries = Vec::with_capacity(listing.len());
            for mut entry in listing {
                if entry.is_directory() {
                    entry.assign_groups_from_url();
                    let sub_listing = self.fetch_level(&entry.url).await?;
                    let children = self.index_listing(sub_listing).await?;
                    entry = index_directory(entry, children);
                }
                entries.push(entry);
            }
            Ok(entries)
        }
        .boxed()
    }
}

/// Attach `children` to `directory` and build its dataset index
///
/// Only sub-directories and dataset files are retained. Dataset files take
/// the directory's groups; the newest file per dataset is the one with the
/// strictly greatest modification time, so ties keep the first listed.
pub fn index_directory(mut directory: CatalogEntry, children: Vec<CatalogEntry>) -> CatalogEntry {
    directory.assign_groups_from_url();
    let groups = directory.groups().to_vec();

    let mut retained = Vec::with_capacity(children.len());
    let mut datasets_by_name: HashMap<String, Vec<usize>> = HashMap::new();
    let mut latest_by_name: HashMap<String, usize> = HashMap::new();

    for mut child in children {
        if child.is_directory() {
            retained.push(child);
            continue;
        }

        let Some(dataset) = child.is_dataset().then(|| child.dataset_name()).flatten() else {
            debug!("skipping {} in {}", child.name, directory.url);
            continue;
        };
        let dataset = dataset.to_string();

        child.set_groups(groups.clone());
        let index = retained.len();

        match latest_by_name.get(&dataset) {
            Some(&current) if retained[current].modified_at_millis >= child.modified_at_millis => {}
            _ => {
                latest_by_name.insert(dataset.clone(), index);
            }
        }
        datasets_by_name.entry(dataset).or_default().push(index);
        retained.push(child);
    }

    directory.set_index(retained, datasets_by_name, latest_by_name);
    directory
}
