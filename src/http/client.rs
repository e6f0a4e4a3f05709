use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;

/// HTTP client that spaces successive requests by a fixed delay.
///
/// A full capture walks a couple hundred small pages; the pause between
/// fetches keeps the site happy.
pub struct PacedClient {
    client: Client,
    delay: Duration,
    requests_sent: usize,
}

impl PacedClient {
    pub fn new(user_agent: &str, timeout_secs: u64, delay_ms: u64) -> Result<Self> {
        let client = Self::build_client(user_agent, timeout_secs)?;
        Ok(Self {
            client,
            delay: Duration::from_millis(delay_ms),
            requests_sent: 0,
        })
    }

    /// Fetch a page as text. Sleeps the configured delay before every
    /// request after the first; non-success statuses are errors.
    pub async fn fetch_text(&mut self, url: &str) -> Result<String> {
        if self.requests_sent > 0 {
            sleep(self.delay).await;
        }
        self.requests_sent += 1;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("Request to {url} was rejected"))?;

        response
            .text()
            .await
            .context("Failed to read response body")
    }

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }
}
