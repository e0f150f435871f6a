//! Streaming file downloads
//!
//! Response bodies are written chunk by chunk straight to their destination.
//! There is no temp file: a short or interrupted download leaves the partial
//! file in place for the size check to report.

use std::path::Path;

use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::errors::{DownloadError, DownloadResult};

/// File download operations handler
pub struct DownloadHandler<'a> {
    client: &'a Client,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler over a shared client
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Streams `url` into `destination`, truncating any existing file
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The HTTP request fails or the status is not a success
    /// - The destination cannot be created or written
    pub async fn download_to_path(&self, url: &Url, destination: &Path) -> DownloadResult<u64> {
        let mut response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::Status {
                status: response.status().as_u16(),
            });
        }

        let mut file = File::create(destination)
            .await
            .map_err(|e| DownloadError::filesystem(destination, e))?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::filesystem(destination, e))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| DownloadError::filesystem(destination, e))?;

        debug!("wrote {} bytes to {}", written, destination.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_streams_body_to_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/web_2022-01-01.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"zip-bytes".to_vec()))
            .mount(&server)
            .await;

        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("web_2022-01-01.zip");
        let url = Url::parse(&format!("{}/files/web_2022-01-01.zip", server.uri())).unwrap();

        let client = Client::new();
        let written = DownloadHandler::new(&client)
            .download_to_path(&url, &destination)
            .await
            .unwrap();

        assert_eq!(written, 9);
        assert_eq!(tokio::fs::read(&destination).await.unwrap(), b"zip-bytes");
    }

    #[tokio::test]
    async fn test_error_status_does_not_create_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("missing.zip");
        let url = Url::parse(&format!("{}/missing.zip", server.uri())).unwrap();

        let client = Client::new();
        let result = DownloadHandler::new(&client)
            .download_to_path(&url, &destination)
            .await;

        assert!(matches!(result, Err(DownloadError::Status { status: 404 })));
        assert!(!destination.exists());
    }
}
