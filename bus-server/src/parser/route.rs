//! Route page parsing.

use tracing::{debug, warn};

use crate::document::RenderedDocument;
use crate::domain::{ArrivalRecord, NormalizedState, StationTarget, UNKNOWN_ROUTE};
use crate::normalize::ArrivalTextNormalizer;

use super::matcher::find_row;
use super::table::{ScheduleTable, TableSelector};

/// Bracket pairs that wrap the route name in page titles, most specific first.
const TITLE_BRACKETS: [(char, char); 4] = [('【', '】'), ('[', ']'), ('（', '）'), ('(', ')')];

/// Delimiters separating the route name from the rest of a title.
const TITLE_DELIMITERS: [&str; 3] = [" - ", "|", "｜"];

/// Route-level parse failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// No table qualified as the schedule table
    #[error("no schedule table")]
    NoScheduleTable,
}

/// Everything read from one route page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParse {
    /// Route label derived from the page title.
    pub route_label: String,
    /// One record per target, in target order.
    pub records: Vec<ArrivalRecord>,
}

impl RouteParse {
    /// Record for the target with `key`.
    pub fn record(&self, key: &str) -> Option<&ArrivalRecord> {
        self.records.iter().find(|r| r.target_key == key)
    }
}

/// Extracts per-station arrival records from a rendered route page.
#[derive(Debug, Clone)]
pub struct RouteTableParser {
    selectors: Vec<TableSelector>,
    normalizer: ArrivalTextNormalizer,
}

impl RouteTableParser {
    pub fn new(selectors: Vec<TableSelector>, normalizer: ArrivalTextNormalizer) -> Self {
        Self {
            selectors,
            normalizer,
        }
    }

    /// Parse one page.
    ///
    /// Fails only when no schedule table can be found. A target missing
    /// from the table gets a "station not found" record; the others are
    /// unaffected.
    pub fn parse<D: RenderedDocument + ?Sized>(
        &self,
        doc: &D,
        targets: &[StationTarget],
    ) -> Result<RouteParse, ParseError> {
        let route_label = route_label_from_title(doc.title());

        let table = ScheduleTable::select(doc.tables(), &self.selectors)
            .ok_or(ParseError::NoScheduleTable)?;
        let labels = table.direction_labels();
        debug!(
            route = %route_label,
            table = table.index(),
            outbound = %labels.outbound,
            inbound = %labels.inbound,
            "schedule table selected"
        );

        let records = targets
            .iter()
            .map(|target| self.read_target(&table, &route_label, target))
            .collect();

        Ok(RouteParse {
            route_label,
            records,
        })
    }

    fn read_target(
        &self,
        table: &ScheduleTable<'_>,
        route_label: &str,
        target: &StationTarget,
    ) -> ArrivalRecord {
        let found = find_row(table, &target.name, target.direction);
        let m = match found {
            Ok(m) => m,
            Err(e) => {
                warn!(route = route_label, target = %target.key, "{e}");
                return ArrivalRecord::synthesized(
                    route_label,
                    &target.key,
                    NormalizedState::station_not_found(),
                );
            }
        };

        let raw = table
            .row(m.row)
            .and_then(|r| r.cell(m.info_column))
            .unwrap_or_default();
        let state = self.normalizer.normalize(raw);
        debug!(
            route = route_label,
            target = %target.key,
            row = m.row,
            kind = ?m.kind,
            raw,
            ?state,
            "read arrival cell"
        );

        ArrivalRecord::observed(route_label, &target.key, raw, state)
    }
}

/// Derive a route label from a page title.
///
/// Uses the text inside the first bracket pair, else the text before the
/// first delimiter, else the whole title. An empty result is
/// [`UNKNOWN_ROUTE`].
pub fn route_label_from_title(title: &str) -> String {
    bracketed(title)
        .or_else(|| delimited(title))
        .or_else(|| Some(title.trim()).filter(|t| !t.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_ROUTE.to_string())
}

fn bracketed(title: &str) -> Option<&str> {
    TITLE_BRACKETS.iter().find_map(|&(open, close)| {
        let start = title.find(open)? + open.len_utf8();
        let len = title[start..].find(close)?;
        Some(title[start..start + len].trim()).filter(|s| !s.is_empty())
    })
}

fn delimited(title: &str) -> Option<&str> {
    TITLE_DELIMITERS.iter().find_map(|delim| {
        let (head, _) = title.split_once(delim)?;
        Some(head.trim()).filter(|s| !s.is_empty())
    })
}
