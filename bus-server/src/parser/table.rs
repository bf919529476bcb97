//! Schedule table selection and header reading.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::document::{Row, Table};
use crate::domain::{Direction, DirectionLabels};

/// Minimum rows for a usable schedule table: a header plus one data row.
pub const MIN_TABLE_ROWS: usize = 2;

/// A strategy for picking the schedule table out of a page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSelector {
    /// The first table with any cell containing this marker (e.g. "去程").
    ByContentMarker(String),
    /// The table at this zero-based position in document order.
    ByPosition(usize),
}

impl TableSelector {
    /// The selectors used when none are configured: direction markers,
    /// then the third table on the page.
    pub fn defaults() -> Vec<TableSelector> {
        vec![
            TableSelector::ByContentMarker("去程".to_string()),
            TableSelector::ByContentMarker("返程".to_string()),
            TableSelector::ByPosition(2),
        ]
    }

    fn select<'a>(&self, tables: &'a [Table]) -> Option<(usize, &'a Table)> {
        match self {
            TableSelector::ByContentMarker(marker) => tables
                .iter()
                .enumerate()
                .find(|(_, t)| t.len() >= MIN_TABLE_ROWS && t.contains_text(marker)),
            TableSelector::ByPosition(index) => tables
                .get(*index)
                .filter(|t| t.len() >= MIN_TABLE_ROWS)
                .map(|t| (*index, t)),
        }
    }

    fn is_content_marker(&self) -> bool {
        matches!(self, TableSelector::ByContentMarker(_))
    }
}

/// The table believed to hold the bidirectional schedule.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleTable<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> ScheduleTable<'a> {
    /// Select a schedule table.
    ///
    /// Content-marker selectors are tried before positional ones, each group
    /// in configured order. Tables with fewer than [`MIN_TABLE_ROWS`] rows
    /// never qualify.
    pub fn select(tables: &'a [Table], selectors: &[TableSelector]) -> Option<Self> {
        let ordered = selectors
            .iter()
            .filter(|s| s.is_content_marker())
            .chain(selectors.iter().filter(|s| !s.is_content_marker()));

        for selector in ordered {
            if let Some((index, table)) = selector.select(tables) {
                debug!(?selector, index, rows = table.len(), "selected schedule table");
                return Some(Self { table, index });
            }
        }
        None
    }

    /// Wrap a table directly, bypassing selection.
    pub fn from_table(table: &'a Table) -> Self {
        Self { table, index: 0 }
    }

    /// Position of the table in the document.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn header(&self) -> Option<&'a Row> {
        self.table.row(0)
    }

    /// Data rows with their row index in the table (the header is row 0).
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &'a Row)> + 'a {
        self.table.rows().iter().enumerate().skip(1)
    }

    pub fn row(&self, index: usize) -> Option<&'a Row> {
        self.table.row(index)
    }

    /// Direction labels from the header row.
    ///
    /// The first and last non-empty header cells name the outbound and
    /// inbound directions. Fewer than two non-empty cells is a malformed
    /// header and falls back to the generic labels.
    pub fn direction_labels(&self) -> DirectionLabels {
        let named: Vec<&str> = self
            .header()
            .map(|h| {
                h.cells()
                    .iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        match named.as_slice() {
            [outbound, .., inbound] => DirectionLabels::new(*outbound, *inbound),
            _ => {
                warn!(
                    table = self.index,
                    cells = named.len(),
                    "malformed direction header; using default labels"
                );
                DirectionLabels::default()
            }
        }
    }
}

/// Station and arrival-info column indices for a direction in a row of
/// `row_len` cells.
///
/// Outbound is the first pair of cells, inbound the last pair. A row of two
/// cells or fewer has no inbound half.
pub fn direction_columns(direction: Direction, row_len: usize) -> Option<(usize, usize)> {
    match direction {
        Direction::Outbound if row_len >= 2 => Some((0, 1)),
        Direction::Inbound if row_len > 2 => Some((row_len - 2, row_len - 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Table {
        Table::from_cells(&[&["home", "routes"], &["a", "b"]])
    }

    fn schedule() -> Table {
        Table::from_cells(&[&["去程", "返程"], &["站A", "3分"]])
    }

    #[test]
    fn content_marker_wins_over_position() {
        let tables = vec![menu(), schedule(), menu()];
        let selected = ScheduleTable::select(
            &tables,
            &[TableSelector::ByPosition(2), TableSelector::ByContentMarker("去程".into())],
        )
        .unwrap();
        assert_eq!(selected.index(), 1);
    }

    #[test]
    fn position_fallback() {
        let tables = vec![menu(), menu(), Table::from_cells(&[&["往A", "往B"], &["x", "1分"]])];
        let selected = ScheduleTable::select(&tables, &TableSelector::defaults()).unwrap();
        assert_eq!(selected.index(), 2);
    }

    #[test]
    fn short_tables_do_not_qualify() {
        let tables = vec![Table::from_cells(&[&["去程", "返程"]])];
        assert!(ScheduleTable::select(&tables, &TableSelector::defaults()).is_none());
        assert!(ScheduleTable::select(&tables, &[TableSelector::ByPosition(0)]).is_none());
    }

    #[test]
    fn missing_position_is_none() {
        let tables = vec![schedule()];
        assert!(ScheduleTable::select(&tables, &[TableSelector::ByPosition(4)]).is_none());
    }

    #[test]
    fn labels_from_header() {
        let table = Table::from_cells(&[&["去程 往板橋", "", "返程 往撫遠街", ""], &["a", "b", "c", "d"]]);
        let labels = ScheduleTable::from_table(&table).direction_labels();
        assert_eq!(labels, DirectionLabels::new("去程 往板橋", "返程 往撫遠街"));
    }

    #[test]
    fn malformed_header_defaults() {
        let table = Table::from_cells(&[&["只有一格", ""], &["a", "b"]]);
        let labels = ScheduleTable::from_table(&table).direction_labels();
        assert_eq!(labels, DirectionLabels::default());
    }

    #[test]
    fn data_rows_skip_header() {
        let table = schedule();
        let rows: Vec<_> = ScheduleTable::from_table(&table).data_rows().map(|(i, _)| i).collect();
        assert_eq!(rows, vec![1]);
    }

    #[test]
    fn columns_by_row_width() {
        assert_eq!(direction_columns(Direction::Outbound, 2), Some((0, 1)));
        assert_eq!(direction_columns(Direction::Inbound, 2), None);
        assert_eq!(direction_columns(Direction::Inbound, 4), Some((2, 3)));
        assert_eq!(direction_columns(Direction::Outbound, 1), None);
    }

    #[test]
    fn selector_deserializes() {
        #[derive(Deserialize)]
        struct Wrapper {
            selectors: Vec<TableSelector>,
        }
        let w: Wrapper = toml::from_str(
            r#"selectors = [{ by_content_marker = "去程" }, { by_position = 2 }]"#,
        )
        .unwrap();
        assert_eq!(
            w.selectors,
            vec![TableSelector::ByContentMarker("去程".into()), TableSelector::ByPosition(2)]
        );
    }
}
