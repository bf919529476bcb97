//! Station row matching.
//!
//! Station names are matched by substring containment, never equality:
//! pages embed names in longer strings with stop-order prefixes.
//!
//! Matching is two passes over the data rows, top to bottom:
//!
//! 1. the configured direction's station column contains the full name;
//! 2. any whitespace-separated token of the name is contained in either
//!    cell of the configured direction's (station, info) pair. The arrival
//!    info is then read from the *other* cell of that pair, which handles
//!    pages whose columns are swapped.
//!
//! Neither pass reads the opposite direction's half of a row. A row of two
//! cells has a single pair, which serves both directions.
//!
//! The first match wins. A station listed twice in one direction only ever
//! reports its first row.

use crate::domain::Direction;

use super::table::{ScheduleTable, direction_columns};

/// How a row was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Full name found in the configured direction's station column.
    Exact,
    /// A name token found by the looser second pass.
    Fallback,
}

/// A matched row and the column holding its arrival text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMatch {
    /// Row index within the table (the header is row 0).
    pub row: usize,
    /// Column the name was found in.
    pub name_column: usize,
    /// Column to read arrival text from.
    pub info_column: usize,
    /// Direction half of the row the match came from.
    pub direction: Direction,
    pub kind: MatchKind,
}

/// No row in the table mentions the station.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("station {name:?} ({direction}) not found")]
pub struct StationNotFound {
    pub name: String,
    pub direction: Direction,
}

/// Find the row for `station_name` in `direction`.
pub fn find_row(
    table: &ScheduleTable<'_>,
    station_name: &str,
    direction: Direction,
) -> Result<RowMatch, StationNotFound> {
    exact_match(table, station_name, direction)
        .or_else(|| token_match(table, station_name, direction))
        .ok_or_else(|| StationNotFound {
            name: station_name.to_string(),
            direction,
        })
}

fn exact_match(
    table: &ScheduleTable<'_>,
    station_name: &str,
    direction: Direction,
) -> Option<RowMatch> {
    if station_name.is_empty() {
        return None;
    }
    table.data_rows().find_map(|(row_idx, row)| {
        let (name_column, info_column) = direction_columns(direction, row.len())?;
        row.cell(name_column)?
            .contains(station_name)
            .then_some(RowMatch {
                row: row_idx,
                name_column,
                info_column,
                direction,
                kind: MatchKind::Exact,
            })
    })
}

fn token_match(
    table: &ScheduleTable<'_>,
    station_name: &str,
    direction: Direction,
) -> Option<RowMatch> {
    let tokens: Vec<&str> = station_name.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    for (row_idx, row) in table.data_rows() {
        let half = if row.len() > 2 {
            direction
        } else {
            Direction::Outbound
        };
        let Some((station_col, info_col)) = direction_columns(half, row.len()) else {
            continue;
        };
        for (name_column, info_column) in [(station_col, info_col), (info_col, station_col)] {
            let Some(cell) = row.cell(name_column) else {
                continue;
            };
            if tokens.iter().any(|t| cell.contains(t)) {
                return Some(RowMatch {
                    row: row_idx,
                    name_column,
                    info_column,
                    direction: half,
                    kind: MatchKind::Fallback,
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Table;

    fn two_way() -> Table {
        Table::from_cells(&[
            &["去程", "", "返程", ""],
            &["1 站A", "3分", "9 站Z", "尚未發車"],
            &["2 站B", "已到站", "8 站Y", "5分"],
            &["3 站C", "2站", "7 站A", "12分"],
        ])
    }

    #[test]
    fn exact_outbound() {
        let table = two_way();
        let m = find_row(&ScheduleTable::from_table(&table), "站B", Direction::Outbound).unwrap();
        assert_eq!(m.row, 2);
        assert_eq!(m.info_column, 1);
        assert_eq!(m.kind, MatchKind::Exact);
    }

    #[test]
    fn exact_inbound_reads_last_pair() {
        let table = two_way();
        let m = find_row(&ScheduleTable::from_table(&table), "站Y", Direction::Inbound).unwrap();
        assert_eq!((m.row, m.name_column, m.info_column), (2, 2, 3));
    }

    #[test]
    fn direction_disambiguates_same_name() {
        // 站A appears outbound in row 1 and inbound in row 3.
        let table = two_way();
        let schedule = ScheduleTable::from_table(&table);
        assert_eq!(find_row(&schedule, "站A", Direction::Outbound).unwrap().row, 1);
        assert_eq!(find_row(&schedule, "站A", Direction::Inbound).unwrap().row, 3);
    }

    #[test]
    fn first_match_wins() {
        let table = Table::from_cells(&[&["去程", "返程"], &["站A", "3分"], &["站A", "9分"]]);
        let m = find_row(&ScheduleTable::from_table(&table), "站A", Direction::Outbound).unwrap();
        assert_eq!(m.row, 1);
    }

    #[test]
    fn fallback_on_swapped_columns() {
        // Time first, station second.
        let table = Table::from_cells(&[&["去程", "返程"], &["4分", "站Q"]]);
        let m = find_row(&ScheduleTable::from_table(&table), "站Q", Direction::Outbound).unwrap();
        assert_eq!(m.kind, MatchKind::Fallback);
        assert_eq!((m.name_column, m.info_column), (1, 0));
    }

    #[test]
    fn fallback_uses_any_token() {
        let table = two_way();
        let m = find_row(
            &ScheduleTable::from_table(&table),
            "捷運 站C",
            Direction::Outbound,
        )
        .unwrap();
        assert_eq!(m.row, 3);
        assert_eq!(m.info_column, 1);
        assert_eq!(m.kind, MatchKind::Fallback);
    }

    #[test]
    fn fallback_never_reads_the_opposite_half() {
        // 站Z is only listed inbound.
        let table = two_way();
        let schedule = ScheduleTable::from_table(&table);
        assert!(find_row(&schedule, "站Z", Direction::Outbound).is_err());

        let table = Table::from_cells(&[
            &["去程", "", "返程", ""],
            &["信義大安路口", "3分", "9 站Z", "尚未發車"],
        ]);
        assert!(
            find_row(&ScheduleTable::from_table(&table), "信義大安路口", Direction::Inbound)
                .is_err()
        );
    }

    #[test]
    fn earlier_opposite_token_does_not_shadow_later_row() {
        let table = Table::from_cells(&[
            &["去程", "", "返程", ""],
            &["1 站A", "3分", "9 捷運站", "尚未發車"],
            &["3 站C", "2站", "7 站Y", "12分"],
        ]);
        let m = find_row(
            &ScheduleTable::from_table(&table),
            "捷運 站C",
            Direction::Outbound,
        )
        .unwrap();
        assert_eq!((m.row, m.info_column), (2, 1));
        assert_eq!(m.direction, Direction::Outbound);
    }

    #[test]
    fn inbound_on_narrow_table_falls_back_to_outbound_pair() {
        let table = Table::from_cells(&[&["去程", "返程"], &["站A", "3分"]]);
        let m = find_row(&ScheduleTable::from_table(&table), "站A", Direction::Inbound).unwrap();
        assert_eq!(m.kind, MatchKind::Fallback);
        assert_eq!(m.info_column, 1);
    }

    #[test]
    fn absent_station_is_not_found() {
        let table = two_way();
        let err = find_row(&ScheduleTable::from_table(&table), "市政府", Direction::Outbound)
            .unwrap_err();
        assert_eq!(
            err,
            StationNotFound {
                name: "市政府".into(),
                direction: Direction::Outbound
            }
        );
    }

    #[test]
    fn header_row_is_never_matched() {
        let table = Table::from_cells(&[&["去程", "返程"], &["站A", "3分"]]);
        assert!(find_row(&ScheduleTable::from_table(&table), "去程", Direction::Outbound).is_err());
    }
}
