//! HTTP client wrapper for page fetches and streaming file downloads.
//!
//! Two timeout profiles are used: a short one for the page-listing fetch
//! and a long one for large file bodies. The profiles differ only in
//! configuration; behavior is identical.

mod error;

pub use error::FetchError;

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};

/// HTTP connect timeout for both profiles (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Total timeout for the page-listing fetch (30 seconds).
pub const PAGE_TIMEOUT_SECS: u64 = 30;

/// Total timeout for file transfers (5 minutes, large files).
pub const TRANSFER_TIMEOUT_SECS: u64 = 300;

/// HTTP client for page fetches and streaming downloads.
///
/// Created once per phase and reused across requests to take advantage
/// of connection pooling. The User-Agent is installed at build time and
/// sent with every request.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    /// Creates a client with the short page-fetch timeout budget.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn for_page(user_agent: &str) -> Self {
        Self::with_timeout(user_agent, PAGE_TIMEOUT_SECS)
    }

    /// Creates a client with the long transfer timeout budget.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn for_transfer(user_agent: &str) -> Self {
        Self::with_timeout(user_agent, TRANSFER_TIMEOUT_SECS)
    }

    /// Creates a client with an explicit total timeout in seconds.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeout(user_agent: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .user_agent(user_agent)
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Issues a GET request and checks the response status.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Timeout`] or [`FetchError::Network`] on
    /// transport failure, and [`FetchError::HttpStatus`] for non-2xx
    /// responses.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        Ok(response)
    }

    /// Fetches a page body as text.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`get`](Self::get), plus
    /// [`FetchError::Network`] if reading the body fails.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|e| FetchError::network(url, e))
    }

    /// Streams the response body for `url` to a file at `path`.
    ///
    /// Returns the number of bytes written. A partially-written file is
    /// removed when the transfer fails.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`get`](Self::get), plus
    /// [`FetchError::Io`] when creating or writing the file fails.
    #[instrument(skip(self), fields(url = %url, path = %path.display()))]
    pub async fn download_to_path(&self, url: &str, path: &Path) -> Result<u64, FetchError> {
        let response = self.get(url).await?;

        let file = File::create(path)
            .await
            .map_err(|e| FetchError::io(path.to_path_buf(), e))?;

        let result = stream_to_file(file, response, url, path).await;

        if result.is_err() {
            debug!(path = %path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(path).await;
        }

        result
    }
}

/// Streams the response body to a file, returning bytes written.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
) -> Result<u64, FetchError> {
    let mut writer = BufWriter::new(file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| FetchError::network(url, e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| FetchError::io(path.to_path_buf(), e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| FetchError::io(path.to_path_buf(), e))?;

    Ok(bytes_written)
}
