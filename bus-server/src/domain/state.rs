//! Normalized arrival states.

use std::fmt;

/// Reason recorded when a route's page could not be loaded in time.
pub const TIMEOUT_REASON: &str = "timeout";

/// Reason recorded when a target station has no row on a route's page.
pub const STATION_NOT_FOUND_REASON: &str = "station not found";

/// The closed set of semantic arrival outcomes for one cell of text.
///
/// `Display` yields the fixed string shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NormalizedState {
    /// An explicit countdown was present.
    Minutes(u32),
    /// The bus is arriving or pulling in.
    Approaching,
    /// The bus has not left its origin yet.
    NotYetDeparted,
    /// The row refers to a terminus or depot, not an upcoming arrival.
    Terminal,
    /// "N stops away" phrasing.
    StepsAway(u32),
    /// Text that matched nothing, passed through verbatim.
    Unknown(String),
}

impl NormalizedState {
    /// State for a route whose page did not become ready before its deadline.
    pub fn timeout() -> Self {
        NormalizedState::Unknown(TIMEOUT_REASON.to_string())
    }

    /// State for a route that failed for any reason other than a timeout.
    pub fn error(message: impl fmt::Display) -> Self {
        NormalizedState::Unknown(format!("error: {message}"))
    }

    /// State for a station absent from a route's table.
    pub fn station_not_found() -> Self {
        NormalizedState::Unknown(STATION_NOT_FOUND_REASON.to_string())
    }

    /// Whether this state carries a usable arrival.
    pub fn is_known(&self) -> bool {
        !matches!(self, NormalizedState::Unknown(_))
    }
}

impl fmt::Display for NormalizedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizedState::Minutes(n) => write!(f, "{n} minutes away"),
            NormalizedState::Approaching => f.write_str("arriving"),
            NormalizedState::NotYetDeparted => f.write_str("not yet departed"),
            NormalizedState::Terminal => f.write_str("terminal stop"),
            NormalizedState::StepsAway(n) => write!(f, "{n} stops away"),
            NormalizedState::Unknown(text) if text.is_empty() => f.write_str("no data"),
            NormalizedState::Unknown(text) => f.write_str(text),
        }
    }
}
