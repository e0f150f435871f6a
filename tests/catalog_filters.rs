//! Catalog indexing and filtering against the reference fixture catalog

mod common;

use std::collections::HashSet;

use extract_fetcher::app::cache::{CacheConfig, SnapshotCache};
use extract_fetcher::app::filter::parse_since;
use extract_fetcher::app::{filter_files, CatalogIndexer, FilterCriteria, MatchedFile};
use extract_fetcher::errors::CatalogError;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{build_catalog, client_for, mount_reference_catalog};

struct Tally {
    files: usize,
    groups: usize,
    datasets: usize,
    latest: usize,
}

fn tally(matches: &[MatchedFile<'_>]) -> Tally {
    let groups: HashSet<String> = matches.iter().map(|m| m.groups().join("/")).collect();
    let datasets: HashSet<&str> = matches.iter().map(|m| m.dataset).collect();
    Tally {
        files: matches.len(),
        groups: groups.len(),
        datasets: datasets.len(),
        latest: matches.iter().filter(|m| m.latest).count(),
    }
}

async fn reference_server() -> MockServer {
    let server = MockServer::start().await;
    mount_reference_catalog(&server).await;
    server
}

#[tokio::test]
async fn test_catalog_structure() {
    let server = reference_server().await;
    let catalog = build_catalog(&server).await;

    // Root README is not a dataset file and is dropped
    assert_eq!(catalog.entries().len(), 4);
    assert_eq!(catalog.directories().len(), 4);
    assert_eq!(catalog.dataset_file_count(), 24);

    let android = &catalog.entries()[0];
    assert_eq!(android.groups(), ["android".to_string()]);
    assert_eq!(
        android.latest("android").map(|e| e.name.as_str()),
        Some("android_2022-05-01.zip")
    );
}

#[tokio::test]
async fn test_all_versions_without_filters() {
    let server = reference_server().await;
    let catalog = build_catalog(&server).await;

    let criteria = FilterCriteria::new().with_latest_only(false);
    let result = tally(&filter_files(catalog.entries(), &criteria));

    assert_eq!(result.files, 24);
    assert_eq!(result.groups, 4);
    assert_eq!(result.datasets, 5);
    assert_eq!(result.latest, 5);
}

#[tokio::test]
async fn test_latest_only() {
    let server = reference_server().await;
    let catalog = build_catalog(&server).await;

    let criteria = FilterCriteria::new().with_latest_only(true);
    let matches = filter_files(catalog.entries(), &criteria);

    assert_eq!(matches.len(), 5);
    assert!(matches.iter().all(|m| m.latest));
    let names: HashSet<&str> = matches.iter().map(|m| m.name).collect();
    assert!(names.contains("ios_cell_2022-05-01.zip"));
    assert!(names.contains("desktop_2022-04-01.zip"));
}

#[tokio::test]
async fn test_group_filter() {
    let server = reference_server().await;
    let catalog = build_catalog(&server).await;

    let criteria = FilterCriteria::new()
        .with_groups(vec!["android".to_string(), "web".to_string()])
        .with_latest_only(false);
    let result = tally(&filter_files(catalog.entries(), &criteria));

    assert_eq!(result.files, 12);
    assert_eq!(result.groups, 2);
    assert_eq!(result.datasets, 2);
}

#[tokio::test]
async fn test_dataset_filter() {
    let server = reference_server().await;
    let catalog = build_catalog(&server).await;

    let criteria = FilterCriteria::new()
        .with_datasets(vec!["desktop".to_string()])
        .with_latest_only(false);
    let result = tally(&filter_files(catalog.entries(), &criteria));

    assert_eq!(result.files, 5);
    assert_eq!(result.groups, 1);
    assert_eq!(result.datasets, 1);
}

#[tokio::test]
async fn test_since_filter_overrides_latest_only() {
    let server = reference_server().await;
    let catalog = build_catalog(&server).await;

    let cutoff = parse_since("2022-05-01").unwrap();
    let criteria = FilterCriteria::new()
        .with_since(Some(cutoff))
        .with_latest_only(true);
    let matches = filter_files(catalog.entries(), &criteria);
    let result = tally(&matches);

    assert_eq!(result.files, 16);
    assert_eq!(result.groups, 4);
    assert_eq!(result.datasets, 5);
    assert_eq!(result.latest, 5);
    assert!(matches.iter().all(|m| m.updated > cutoff));
}

#[tokio::test]
async fn test_filename_filter() {
    let server = reference_server().await;
    let catalog = build_catalog(&server).await;

    let criteria = FilterCriteria::new()
        .with_filenames(vec![
            "android_2022-05-01".to_string(),
            "desktop_2022-04-01.zip".to_string(),
        ])
        .with_filename_extension_fallback(".zip")
        .with_latest_only(true);
    let matches = filter_files(catalog.entries(), &criteria);

    let names: HashSet<&str> = matches.iter().map(|m| m.name).collect();
    assert_eq!(matches.len(), 2);
    assert!(names.contains("android_2022-05-01.zip"));
    assert!(names.contains("desktop_2022-04-01.zip"));
}

#[tokio::test]
async fn test_snapshot_reused_without_requests() {
    let server = reference_server().await;
    let temp_dir = TempDir::new().unwrap();
    let cache_config = CacheConfig::with_cache_file(temp_dir.path().join("cache.json"))
        .with_duration_minutes(30);
    let client = client_for(&server);

    let mut cache = SnapshotCache::open(cache_config.clone()).await;
    let first = CatalogIndexer::new(&client, &mut cache).build().await.unwrap();
    assert!(cache.persist().await);

    // Every listing must now come from the snapshot
    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut cache = SnapshotCache::open(cache_config).await;
    let second = CatalogIndexer::new(&client, &mut cache).build().await.unwrap();
    assert!(!cache.persist().await);
    assert_eq!(second.dataset_file_count(), first.dataset_file_count());
}

#[tokio::test]
async fn test_root_status_classification() {
    for (status, check) in [
        (401, (|e: &CatalogError| matches!(e, CatalogError::Auth)) as fn(&CatalogError) -> bool),
        (403, |e| matches!(e, CatalogError::Auth)),
        (404, |e| matches!(e, CatalogError::NotFound)),
        (500, |e| matches!(e, CatalogError::Server)),
        (502, |e| matches!(e, CatalogError::UnknownStatus { status: 502 })),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let mut cache = SnapshotCache::disabled();
        let error = CatalogIndexer::new(&client, &mut cache)
            .build()
            .await
            .unwrap_err();
        assert!(check(&error), "unexpected error for {status}: {error:?}");
    }
}
