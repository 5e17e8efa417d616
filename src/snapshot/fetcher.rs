//! Page retrieval.
//!
//! [`PageFetcher`] is the seam between the snapshot builder and the
//! network. [`HttpFetcher`] is the production implementation on
//! `reqwest`; tests substitute in-memory fetchers.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::FetchError;

/// Maximum number of redirects followed per fetch.
pub const MAX_REDIRECTS: usize = 5;

/// Retrieves the raw markup of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync + fmt::Debug {
    /// Fetches `url` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Status`] for non-2xx responses and
    /// [`FetchError::Transport`] for connection, timeout, or body
    /// failures.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest`-backed [`PageFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with the given timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if the HTTP client cannot be
    /// constructed.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::InvalidUrl(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_builder() {
                FetchError::InvalidUrl(url.to_string())
            } else {
                transport(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "page fetch returned non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        tracing::debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}
