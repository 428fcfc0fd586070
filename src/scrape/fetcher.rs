//! Page fetching

use super::extract::extract_text;
use crate::network::HttpClient;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Fixed per-page timeout
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// A page that could not be turned into text
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("{0}")]
    Network(reqwest::Error),
}

/// Downloads pages and reduces them to bounded plain text
#[derive(Clone)]
pub struct PageFetcher {
    client: HttpClient,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            timeout: PAGE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// GET `url` and return at most `max_length` characters of its visible text.
    ///
    /// The status code is not inspected: an error page still has text.
    pub async fn fetch_and_extract(
        &self,
        url: &str,
        max_length: usize,
    ) -> Result<String, FetchError> {
        let response = self.client.get(url, self.timeout).await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Network(e)
            }
        })?;

        debug!(
            "Fetched {} (HTTP {}, {} bytes)",
            url,
            response.status,
            response.text.len()
        );

        Ok(extract_text(&response.text, max_length))
    }
}
