//! Single-level catalog listing requests
//!
//! One request per catalog path. Credentials are attached here and nowhere
//! else, so file downloads never carry them.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::app::client::config::Credentials;
use crate::app::models::CatalogEntry;
use crate::errors::{CatalogError, CatalogResult};

/// Catalog listing operations handler
pub struct CatalogHandler<'a> {
    client: &'a Client,
    credentials: &'a Credentials,
}

impl<'a> CatalogHandler<'a> {
    /// Creates a new CatalogHandler over a shared client
    pub fn new(client: &'a Client, credentials: &'a Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Fetches and parses the listing at `url`
    ///
    /// `is_root` selects how a non-success status is reported: the root
    /// listing maps it onto the user-facing classification (auth, not found,
    /// server, unknown), nested listings report the raw status.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails, the status is not a
    /// success, or the body is not a JSON listing
    pub async fn fetch_listing(&self, url: &str, is_root: bool) -> CatalogResult<Vec<CatalogEntry>> {
        debug!("requesting data from {}", url);

        let response = self
            .client
            .get(url)
            .basic_auth(&self.credentials.api_key, Some(&self.credentials.api_secret))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| {
                debug!("error retrieving extract data from {}: {}", url, source);
                CatalogError::Transport {
                    url: url.to_string(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error = if is_root {
                CatalogError::from_root_status(status.as_u16())
            } else {
                CatalogError::ListingStatus {
                    url: url.to_string(),
                    status: status.as_u16(),
                }
            };
            debug!("error retrieving extract data from {}: {}", url, error);
            return Err(error);
        }

        let body = response
            .text()
            .await
            .map_err(|source| CatalogError::Transport {
                url: url.to_string(),
                source,
            })?;

        let entries: Vec<CatalogEntry> =
            serde_json::from_str(&body).map_err(|source| CatalogError::InvalidListing {
                url: url.to_string(),
                source,
            })?;

        debug!("found {} items in index", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{basic_auth, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> Credentials {
        Credentials::new("key", "secret")
    }

    #[tokio::test]
    async fn test_listing_sends_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/extracts"))
            .and(basic_auth("key", "secret"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"name": "web", "url": "/web/", "type": "dir", "mtime": 0, "size": 0}]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::new();
        let credentials = credentials();
        let handler = CatalogHandler::new(&client, &credentials);
        let entries = handler
            .fetch_listing(&format!("{}/extracts", server.uri()), true)
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_directory());
    }

    #[tokio::test]
    async fn test_root_status_is_classified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = Client::new();
        let credentials = credentials();
        let handler = CatalogHandler::new(&client, &credentials);
        let url = format!("{}/extracts", server.uri());

        let root = handler.fetch_listing(&url, true).await;
        assert!(matches!(root, Err(CatalogError::Auth)));

        let nested = handler.fetch_listing(&url, false).await;
        assert!(matches!(
            nested,
            Err(CatalogError::ListingStatus { status: 403, .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let client = Client::new();
        let credentials = credentials();
        let handler = CatalogHandler::new(&client, &credentials);
        let result = handler.fetch_listing(&server.uri(), true).await;

        assert!(matches!(result, Err(CatalogError::InvalidListing { .. })));
    }
}
