//! Travel direction types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Label used for the outbound column when the header row is unusable.
pub const DEFAULT_OUTBOUND_LABEL: &str = "Outbound";

/// Label used for the inbound column when the header row is unusable.
pub const DEFAULT_INBOUND_LABEL: &str = "Inbound";

/// Which half of a bidirectional schedule table a station is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Outbound,
    Inbound,
}

impl Direction {
    /// Generic display label, independent of any particular page.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Outbound => DEFAULT_OUTBOUND_LABEL,
            Direction::Inbound => DEFAULT_INBOUND_LABEL,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Outbound => f.write_str("outbound"),
            Direction::Inbound => f.write_str("inbound"),
        }
    }
}

/// The pair of direction names read from a schedule table's header row.
///
/// Pages usually name directions after their destination
/// (e.g. "去程 往動物園"), so these are only ever used for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionLabels {
    pub outbound: String,
    pub inbound: String,
}

impl DirectionLabels {
    pub fn new(outbound: impl Into<String>, inbound: impl Into<String>) -> Self {
        Self {
            outbound: outbound.into(),
            inbound: inbound.into(),
        }
    }

    /// Label for the given direction.
    pub fn get(&self, direction: Direction) -> &str {
        match direction {
            Direction::Outbound => &self.outbound,
            Direction::Inbound => &self.inbound,
        }
    }
}

impl Default for DirectionLabels {
    fn default() -> Self {
        Self::new(DEFAULT_OUTBOUND_LABEL, DEFAULT_INBOUND_LABEL)
    }
}
