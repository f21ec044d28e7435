// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::CrawlerConfig;

/// HTTP fetcher shared by all crawl stages.
///
/// Wraps a pooled [`reqwest::Client`] with a per-request timeout and bounded
/// retry with doubling backoff for text fetches.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl Fetcher {
    /// Create a fetcher from crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            retry_attempts: config.retry_attempts,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    /// Fetch a URL and return the full response body as text.
    ///
    /// Non-success statuses are errors. Failures are retried up to the
    /// configured attempt count before the error is returned.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let mut backoff = self.retry_backoff;
        let mut attempt = 0;

        loop {
            match self.try_fetch_text(url).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < self.retry_attempts => {
                    attempt += 1;
                    log::debug!(
                        "Fetch failed for {url} (attempt {attempt}/{}): {e}. Retrying.",
                        self.retry_attempts
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn try_fetch_text(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }

    /// Start a GET whose body the caller consumes as a byte stream.
    ///
    /// `timeout` bounds the whole transfer, from connect until the body is
    /// exhausted, overriding the client's default request timeout.
    pub async fn fetch_stream(&self, url: &str, timeout: Duration) -> Result<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response)
    }
}
