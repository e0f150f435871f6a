//! Shared helpers for integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use extract_fetcher::app::{
    Catalog, CatalogIndexer, ClientConfig, Credentials, ExtractClient, SnapshotCache,
};
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-key";
pub const API_SECRET: &str = "test-secret";
pub const GROUPS: [&str; 4] = ["android", "desktop", "ios", "web"];

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).expect("fixture should be readable")
}

fn json_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/json")
}

/// Mount the reference catalog: a root listing and one listing per group
pub async fn mount_reference_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/extracts"))
        .and(basic_auth(API_KEY, API_SECRET))
        .respond_with(json_response(fixture("extracts.json")))
        .mount(server)
        .await;

    for group in GROUPS {
        Mock::given(method("GET"))
            .and(path(format!("/extracts/{group}/")))
            .and(basic_auth(API_KEY, API_SECRET))
            .respond_with(json_response(fixture(&format!("{group}.json"))))
            .mount(server)
            .await;
    }
}

pub fn client_for(server: &MockServer) -> ExtractClient {
    ExtractClient::new(ClientConfig::new(
        format!("{}/extracts", server.uri()),
        Credentials::new(API_KEY, API_SECRET),
    ))
    .expect("client should build")
}

/// Build the catalog served by `server` without caching
pub async fn build_catalog(server: &MockServer) -> Catalog {
    let client = client_for(server);
    let mut cache = SnapshotCache::disabled();
    CatalogIndexer::new(&client, &mut cache)
        .build()
        .await
        .expect("catalog should build")
}
