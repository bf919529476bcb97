//! Domain error types.
//!
//! These errors represent validation failures when building domain values
//! from configuration. They are distinct from fetch/parse errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A station target was configured without a key
    #[error("station target key must not be empty")]
    EmptyTargetKey,

    /// A station target was configured without a station name
    #[error("station name for target {0:?} must not be empty")]
    EmptyStationName(String),

    /// A route source has no URL
    #[error("route source URL must not be empty")]
    EmptyRouteUrl,
}
