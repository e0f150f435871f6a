//! HTTP client for the extract catalog service
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration, credentials and building
//! - `catalog`: single-level listing requests with status classification
//! - `download`: streaming file downloads
//!
//! A single `ExtractClient` is shared (behind an `Arc`) by the catalog indexer
//! and every download worker; the underlying `reqwest::Client` is safe for
//! concurrent use.

use std::path::Path;

use reqwest::Client;
use url::Url;

use crate::app::models::CatalogEntry;
use crate::errors::{CatalogError, CatalogResult, DownloadError, DownloadResult};

pub mod catalog;
pub mod config;
pub mod download;

pub use config::{ClientConfig, Credentials};

use catalog::CatalogHandler;
use download::DownloadHandler;

/// HTTP client for listing the catalog and downloading extract files
#[derive(Debug, Clone)]
pub struct ExtractClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl ExtractClient {
    /// Creates a new ExtractClient from configuration
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the base URL is invalid or the HTTP client
    /// cannot be built
    pub fn new(config: ClientConfig) -> CatalogResult<Self> {
        Url::parse(&config.base_url).map_err(|e| CatalogError::InvalidUrl {
            url: config.base_url.clone(),
            error: e.to_string(),
        })?;

        let http = config
            .build_http_client()
            .map_err(|source| CatalogError::Transport {
                url: config.base_url.clone(),
                source,
            })?;

        tracing::debug!("Created extract client for {}", config.base_url);

        Ok(Self {
            http,
            base_url: config.base_url,
            credentials: config.credentials,
        })
    }

    /// Full request URL for a catalog path ("" is the root listing)
    pub fn listing_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetches the single-level listing for a catalog path
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on network, status or parse failures. Status
    /// failures of the root listing are classified for the user.
    pub async fn fetch_listing(&self, path: &str) -> CatalogResult<Vec<CatalogEntry>> {
        let url = self.listing_url(path);
        CatalogHandler::new(&self.http, &self.credentials)
            .fetch_listing(&url, path.is_empty())
            .await
    }

    /// Resolves a file URL from the catalog, joining relative URLs onto the base URL
    pub fn resolve_download_url(&self, url: &str) -> DownloadResult<Url> {
        let invalid = |e: url::ParseError| DownloadError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        };

        match Url::parse(url) {
            Ok(parsed) => Ok(parsed),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(&self.base_url).map_err(invalid)?;
                base.join(url).map_err(invalid)
            }
            Err(e) => Err(invalid(e)),
        }
    }

    /// Streams a catalog file to `destination`, returning bytes written
    ///
    /// Download requests carry no credentials.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the URL is invalid, the request fails or
    /// the destination cannot be written
    pub async fn download_file(&self, url: &str, destination: &Path) -> DownloadResult<u64> {
        let url = self.resolve_download_url(url)?;
        DownloadHandler::new(&self.http)
            .download_to_path(&url, destination)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ExtractClient {
        ExtractClient::new(ClientConfig::new(
            "https://catalog.example.com/extracts",
            Credentials::new("key", "secret"),
        ))
        .unwrap()
    }

    #[test]
    fn test_listing_url_appends_path_verbatim() {
        let client = client();
        assert_eq!(client.listing_url(""), "https://catalog.example.com/extracts");
        assert_eq!(
            client.listing_url("/android/"),
            "https://catalog.example.com/extracts/android/"
        );
    }

    #[test]
    fn test_download_url_resolution() {
        let client = client();

        let absolute = client
            .resolve_download_url("https://files.example.com/web_2022-01-01.zip")
            .unwrap();
        assert_eq!(absolute.host_str(), Some("files.example.com"));

        let relative = client.resolve_download_url("/files/web.zip").unwrap();
        assert_eq!(relative.as_str(), "https://catalog.example.com/files/web.zip");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ExtractClient::new(ClientConfig::new(
            "not a url",
            Credentials::new("key", "secret"),
        ));
        assert!(matches!(result, Err(CatalogError::InvalidUrl { .. })));
    }
}
