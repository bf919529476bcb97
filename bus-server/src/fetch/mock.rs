//! Mock page fetcher for development without the live site.
//!
//! Loads saved route pages from a directory and serves them as if they
//! were freshly rendered.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::document::HtmlDocument;
use crate::domain::RouteSource;

use super::PageFetcher;
use super::error::FetchError;

/// Mock fetcher that serves HTML files from a directory.
///
/// Expects files named `{key}.html`. A route source is served the file
/// whose key equals its label, or else the last path segment of its URL.
#[derive(Debug, Clone)]
pub struct MockPageFetcher {
    pages: Arc<HashMap<String, String>>,
}

impl MockPageFetcher {
    /// Load every `.html` file in `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, FetchError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            FetchError::Fixture(format!("failed to read mock page directory {dir:?}: {e}"))
        })?;

        let mut pages = HashMap::new();
        for entry in entries {
            let path = entry
                .map_err(|e| FetchError::Fixture(format!("failed to read directory entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("html") {
                continue;
            }

            let key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| FetchError::Fixture(format!("invalid filename: {path:?}")))?
                .to_string();
            let html = std::fs::read_to_string(&path)
                .map_err(|e| FetchError::Fixture(format!("failed to read {path:?}: {e}")))?;
            pages.insert(key, html);
        }

        if pages.is_empty() {
            return Err(FetchError::Fixture(format!(
                "no mock pages found in {dir:?}"
            )));
        }

        Ok(Self {
            pages: Arc::new(pages),
        })
    }

    /// Build a mock fetcher from in-memory pages.
    pub fn from_pages(pages: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().collect()),
        }
    }

    /// Keys of the available pages, sorted.
    pub fn available(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.pages.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    fn page_for(&self, source: &RouteSource) -> Option<&str> {
        let by_label = source.label.as_deref().and_then(|l| self.pages.get(l));
        let by_path = || {
            let path = source.url.split(['?', '#']).next().unwrap_or_default();
            let segment = path.trim_end_matches('/').rsplit('/').next()?;
            self.pages.get(segment)
        };
        by_label.or_else(by_path).map(String::as_str)
    }
}

impl PageFetcher for MockPageFetcher {
    type Document = HtmlDocument;

    async fn fetch(&self, source: &RouteSource) -> Result<HtmlDocument, FetchError> {
        let html = self
            .page_for(source)
            .ok_or_else(|| FetchError::NoPage(source.display_label().to_string()))?;
        Ok(HtmlDocument::parse(html))
    }
}
