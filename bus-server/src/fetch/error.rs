//! Page fetch error types.

/// Errors from loading a route page.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, client timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The page responded with a non-success status
    #[error("navigation to {url} failed with status {status}")]
    Navigation { url: String, status: u16 },

    /// The readiness condition was not met before the deadline
    #[error("page not ready after {waited_ms} ms")]
    Timeout { waited_ms: u64 },

    /// The readiness selector is not valid CSS
    #[error("invalid readiness selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },

    /// No page is available for the route (mock fetcher)
    #[error("no page available for {0}")]
    NoPage(String),

    /// Fixture loading failed (mock fetcher)
    #[error("fixture error: {0}")]
    Fixture(String),

    /// The fetch resource was shut down
    #[error("fetcher closed")]
    Closed,
}

impl FetchError {
    /// Whether this failure should be reported as a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            FetchError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
