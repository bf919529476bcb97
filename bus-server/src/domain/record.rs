//! Arrival records produced by parsing one route page.

use super::NormalizedState;

/// Route label used when a page title yields nothing usable.
pub const UNKNOWN_ROUTE: &str = "unknown route";

/// One (route, station) observation from a single fetch.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalRecord {
    /// Route the observation came from.
    pub route_label: String,

    /// Key of the `StationTarget` this record answers.
    pub target_key: String,

    /// Cell text as read from the page, before normalization.
    /// `None` when no cell was read (station not found, route failed).
    pub raw_text: Option<String>,

    /// Semantic arrival state.
    pub state: NormalizedState,
}

impl ArrivalRecord {
    /// Record for text read from a matched cell.
    pub fn observed(
        route_label: impl Into<String>,
        target_key: impl Into<String>,
        raw_text: impl Into<String>,
        state: NormalizedState,
    ) -> Self {
        Self {
            route_label: route_label.into(),
            target_key: target_key.into(),
            raw_text: Some(raw_text.into()),
            state,
        }
    }

    /// Record synthesized without reading any cell.
    pub fn synthesized(
        route_label: impl Into<String>,
        target_key: impl Into<String>,
        state: NormalizedState,
    ) -> Self {
        Self {
            route_label: route_label.into(),
            target_key: target_key.into(),
            raw_text: None,
            state,
        }
    }
}
