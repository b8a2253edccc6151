use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;
use reqwest::{Client, header};
use tracing::debug;

use crate::error::Result;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36";

/// Fetches one URL's markup. The scraper is generic over this so tests can
/// substitute canned pages for live HTTP.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

/// reqwest-backed fetcher with a browser User-Agent and a randomized
/// courtesy delay between consecutive requests.
pub struct HttpFetcher {
    client: Client,
    delay_secs: Option<(f64, f64)>,
    requested: AtomicBool,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            delay_secs: Some((1.0, 3.0)),
            requested: AtomicBool::new(false),
        }
    }

    /// No inter-request sleep. For tests against a local mock server.
    pub fn without_delay() -> Self {
        Self {
            delay_secs: None,
            ..Self::new()
        }
    }

    async fn courtesy_delay(&self) {
        let Some((lo, hi)) = self.delay_secs else {
            return;
        };
        // First request goes out immediately; the delay sits between requests.
        if !self.requested.swap(true, Ordering::Relaxed) {
            return;
        }
        let secs = rand::rng().random_range(lo..hi);
        debug!(secs, "courtesy delay before next request");
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String> {
        self.courtesy_delay().await;
        let resp = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }
}
