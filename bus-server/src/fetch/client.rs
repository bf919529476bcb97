//! HTTP page fetcher.
//!
//! Loads a route page over HTTP and re-polls until the page satisfies its
//! readiness condition or the wait times out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{debug, trace};

use crate::document::HtmlDocument;
use crate::domain::RouteSource;

use super::PageFetcher;
use super::error::FetchError;
use super::readiness::ReadinessCondition;

/// Default user agent; some transit sites reject requests without one.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; bus-server/0.1)";

/// Configuration for page fetching.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Per-route deadline in seconds, covering every poll.
    pub timeout_secs: u64,
    /// Delay between polls while the page is not ready, in milliseconds.
    pub poll_interval_ms: u64,
    /// Condition the page must meet before it is parsed.
    pub readiness: ReadinessCondition,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl FetcherConfig {
    /// Set the per-route deadline.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set the readiness condition.
    pub fn with_readiness(mut self, readiness: ReadinessCondition) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            poll_interval_ms: 500,
            readiness: ReadinessCondition::Always,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetches route pages over HTTP.
///
/// Holds a single-permit semaphore: one page load at a time, and the permit
/// is released when a fetch returns, whether it succeeded or not.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    http: reqwest::Client,
    readiness: ReadinessCondition,
    timeout: Duration,
    poll_interval: Duration,
    session: Arc<Semaphore>,
}

impl HttpPageFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            readiness: config.readiness.clone(),
            timeout: config.timeout(),
            poll_interval: config.poll_interval(),
            session: Arc::new(Semaphore::new(1)),
        })
    }

    async fn load_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Navigation {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageFetcher for HttpPageFetcher {
    type Document = HtmlDocument;

    async fn fetch(&self, source: &RouteSource) -> Result<HtmlDocument, FetchError> {
        let _permit = self
            .session
            .acquire()
            .await
            .map_err(|_| FetchError::Closed)?;

        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let body = self.load_once(&source.url).await?;

            if self.readiness.is_satisfied(&body)? {
                debug!(url = %source.url, attempts, bytes = body.len(), "page ready");
                return Ok(HtmlDocument::parse(&body));
            }

            let waited = started.elapsed();
            if waited + self.poll_interval >= self.timeout {
                return Err(FetchError::Timeout {
                    waited_ms: waited.as_millis() as u64,
                });
            }

            trace!(url = %source.url, attempts, "page not ready; polling again");
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
