//! Domain types for the bus arrival engine.
//!
//! Values here are validated at construction time, so code that receives
//! them (the parser, the aggregator, the formatter) can trust them.

mod direction;
mod error;
mod record;
mod state;
mod target;

pub use direction::{DEFAULT_INBOUND_LABEL, DEFAULT_OUTBOUND_LABEL, Direction, DirectionLabels};
pub use error::DomainError;
pub use record::{ArrivalRecord, UNKNOWN_ROUTE};
pub use state::{NormalizedState, STATION_NOT_FOUND_REASON, TIMEOUT_REASON};
pub use target::{RouteSource, StationTarget};
