//! Schedule table parsing.
//!
//! Turns a rendered route page into per-station arrival records:
//! select the schedule table, read its direction labels, find each target
//! station's row and normalize the arrival cell.

mod matcher;
mod route;
mod table;

pub use matcher::{MatchKind, RowMatch, StationNotFound, find_row};
pub use route::{ParseError, RouteParse, RouteTableParser, route_label_from_title};
pub use table::{MIN_TABLE_ROWS, ScheduleTable, TableSelector, direction_columns};
