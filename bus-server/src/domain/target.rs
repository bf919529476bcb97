//! Route sources and station targets.

use super::{Direction, DomainError};

/// One external page holding a single bus route's live schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSource {
    /// Page URL.
    pub url: String,
    /// Optional human label (e.g. the route number).
    pub label: Option<String>,
}

impl RouteSource {
    /// Create a route source, rejecting an empty URL.
    pub fn new(url: impl Into<String>, label: Option<String>) -> Result<Self, DomainError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(DomainError::EmptyRouteUrl);
        }
        let label = label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        Ok(Self { url, label })
    }

    /// Label to show when nothing better is known about the route.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.url)
    }
}

/// A configured station of interest with a required direction.
///
/// `name` is matched as a substring of table cell text, case-sensitively.
/// `key` identifies the target in configuration and reports and must be
/// unique within one configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationTarget {
    pub key: String,
    pub name: String,
    pub direction: Direction,
}

impl StationTarget {
    /// Create a target, rejecting empty keys and names.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        direction: Direction,
    ) -> Result<Self, DomainError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(DomainError::EmptyTargetKey);
        }
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyStationName(key));
        }
        Ok(Self {
            key,
            name,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_source_display_label() {
        let labelled = RouteSource::new("https://example.com/a", Some("307".into())).unwrap();
        assert_eq!(labelled.display_label(), "307");

        let bare = RouteSource::new("https://example.com/b", Some("  ".into())).unwrap();
        assert_eq!(bare.label, None);
        assert_eq!(bare.display_label(), "https://example.com/b");
    }

    #[test]
    fn route_source_rejects_empty_url() {
        assert_eq!(
            RouteSource::new(" ", None),
            Err(DomainError::EmptyRouteUrl)
        );
    }

    #[test]
    fn target_trims_and_validates() {
        let t = StationTarget::new(" cks ", " 中正紀念堂 ", Direction::Inbound).unwrap();
        assert_eq!(t.key, "cks");
        assert_eq!(t.name, "中正紀念堂");

        assert_eq!(
            StationTarget::new("", "站A", Direction::Outbound),
            Err(DomainError::EmptyTargetKey)
        );
        assert_eq!(
            StationTarget::new("a", "", Direction::Outbound),
            Err(DomainError::EmptyStationName("a".into()))
        );
    }
}
