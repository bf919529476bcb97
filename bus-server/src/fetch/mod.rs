//! Route page fetching.
//!
//! A [`PageFetcher`] turns a [`RouteSource`] into a rendered document.
//! Each call owns whatever it needs to load the page (an HTTP session
//! permit, a poll loop) and releases it before returning, so nothing is
//! held from one route to the next.

mod client;
mod error;
mod mock;
mod readiness;

use std::future::Future;

pub use client::{FetcherConfig, HttpPageFetcher};
pub use error::FetchError;
pub use mock::MockPageFetcher;
pub use readiness::ReadinessCondition;

use crate::document::{HtmlDocument, RenderedDocument};
use crate::domain::RouteSource;

/// Source of rendered route pages.
///
/// This abstraction allows the aggregator to be tested with scripted pages.
pub trait PageFetcher: Send + Sync {
    type Document: RenderedDocument + Send;

    /// Load the page for one route.
    fn fetch(
        &self,
        source: &RouteSource,
    ) -> impl Future<Output = Result<Self::Document, FetchError>> + Send;
}

/// The fetcher chosen at startup: live HTTP or saved pages.
#[derive(Debug, Clone)]
pub enum ConfiguredFetcher {
    Http(HttpPageFetcher),
    Mock(MockPageFetcher),
}

impl PageFetcher for ConfiguredFetcher {
    type Document = HtmlDocument;

    async fn fetch(&self, source: &RouteSource) -> Result<HtmlDocument, FetchError> {
        match self {
            ConfiguredFetcher::Http(fetcher) => fetcher.fetch(source).await,
            ConfiguredFetcher::Mock(fetcher) => fetcher.fetch(source).await,
        }
    }
}
