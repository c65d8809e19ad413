//! HTTP fetcher for the delegation feed.

use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::error::GenerateError;
use crate::util::format_bytes;

/// Delegation files are currently a few megabytes; anything past this is a
/// broken or hostile response.
const MAX_FEED_SIZE: usize = 64 * 1024 * 1024;

/// HTTP client for downloading the delegation feed.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher. The timeout bounds the whole request and applies
    /// to both family pipelines alike.
    pub fn new(timeout: Duration) -> Result<Self, GenerateError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("roslist/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GenerateError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Download the feed as UTF-8 text. Single attempt; any failure aborts
    /// the run.
    pub async fn fetch_feed(&self, url: &str) -> Result<String, GenerateError> {
        info!("Fetching delegation feed from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GenerateError::Network(format!("failed to fetch {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(GenerateError::Network(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        if let Some(length) = response.content_length() {
            if length as usize > MAX_FEED_SIZE {
                return Err(GenerateError::Network(format!(
                    "feed too large: {} bytes (max: {} bytes)",
                    length, MAX_FEED_SIZE
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerateError::Network(format!("failed to read feed body: {}", e)))?;

        if body.len() > MAX_FEED_SIZE {
            return Err(GenerateError::Network(format!(
                "feed too large: {} bytes (max: {} bytes)",
                body.len(),
                MAX_FEED_SIZE
            )));
        }

        info!("Fetched {} of feed data", format_bytes(body.len() as u64));
        Ok(body)
    }
}
