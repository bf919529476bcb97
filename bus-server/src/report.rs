//! Report text rendering.
//!
//! Each station's report is a timestamp line, a header naming the station
//! and its direction, then one `<route>: <state>` line per route in route
//! order. The timestamp comes from the aggregation run, so every station's
//! text from one run carries the same time.

use std::fmt::Write;

use askama::Template;
use serde::Serialize;

use crate::aggregate::{AggregationResult, StationReport};

/// Default timestamp format.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    #[error("invalid timestamp format {0:?}")]
    TimestampFormat(String),
}

/// Rendered text for one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedReport {
    pub target_key: String,
    pub text: String,
}

#[derive(Template)]
#[template(path = "station_report.txt")]
struct StationReportTemplate<'a> {
    timestamp: &'a str,
    station: &'a str,
    direction: &'a str,
    lines: Vec<ReportLine>,
}

struct ReportLine {
    route: String,
    state: String,
}

/// Renders aggregation results into per-station text.
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    timestamp_format: String,
}

impl ReportFormatter {
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }

    /// Render every station, in target order.
    pub fn format(&self, result: &AggregationResult) -> Result<Vec<FormattedReport>, FormatError> {
        let mut timestamp = String::new();
        write!(timestamp, "{}", result.generated_at.format(&self.timestamp_format))
            .map_err(|_| FormatError::TimestampFormat(self.timestamp_format.clone()))?;

        result
            .reports
            .iter()
            .map(|report| {
                Ok(FormattedReport {
                    target_key: report.target.key.clone(),
                    text: render_station(&timestamp, report)?,
                })
            })
            .collect()
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

fn render_station(timestamp: &str, report: &StationReport) -> Result<String, FormatError> {
    let template = StationReportTemplate {
        timestamp,
        station: &report.target.name,
        direction: report.target.direction.label(),
        lines: report
            .entries()
            .iter()
            .map(|e| ReportLine {
                route: e.route_label.clone(),
                state: e.state.to_string(),
            })
            .collect(),
    };
    Ok(template.render()?.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::{ArrivalRecord, Direction, NormalizedState, StationTarget};

    fn report(
        key: &str,
        name: &str,
        direction: Direction,
        entries: &[(&str, NormalizedState)],
    ) -> StationReport {
        let target = StationTarget::new(key, name, direction).unwrap();
        let entries = entries
            .iter()
            .map(|(route, state)| ArrivalRecord::synthesized(*route, key, state.clone()))
            .collect();
        StationReport::with_entries(target, entries)
    }

    fn result(reports: Vec<StationReport>) -> AggregationResult {
        AggregationResult {
            generated_at: chrono_tz::Asia::Taipei
                .with_ymd_and_hms(2026, 10, 17, 8, 5, 9)
                .unwrap(),
            reports,
        }
    }

    #[test]
    fn renders_station_text() {
        let result = result(vec![report(
            "cks",
            "中正紀念堂",
            Direction::Inbound,
            &[
                ("307", NormalizedState::Minutes(3)),
                ("265", NormalizedState::Approaching),
                ("0東", NormalizedState::Terminal),
                ("藍28", NormalizedState::StepsAway(2)),
                ("綠1", NormalizedState::NotYetDeparted),
                ("15", NormalizedState::Unknown(String::new())),
                ("18", NormalizedState::Unknown("末班車已過".into())),
            ],
        )]);

        let reports = ReportFormatter::default().format(&result).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].target_key, "cks");
        assert_eq!(
            reports[0].text,
            "Updated: 2026-10-17 08:05:09\n\
             中正紀念堂 (Inbound):\n\
             307: 3 minutes away\n\
             265: arriving\n\
             0東: terminal stop\n\
             藍28: 2 stops away\n\
             綠1: not yet departed\n\
             15: no data\n\
             18: 末班車已過"
        );
    }

    #[test]
    fn route_order_is_preserved_with_failures() {
        let result = result(vec![report(
            "a",
            "站A",
            Direction::Outbound,
            &[
                ("A", NormalizedState::Minutes(3)),
                ("B", NormalizedState::timeout()),
            ],
        )]);

        let text = &ReportFormatter::default().format(&result).unwrap()[0].text;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "A: 3 minutes away");
        assert_eq!(lines[3], "B: timeout");
    }

    #[test]
    fn stations_share_one_timestamp() {
        let result = result(vec![
            report("a", "站A", Direction::Outbound, &[("307", NormalizedState::Minutes(1))]),
            report("b", "站B", Direction::Inbound, &[("307", NormalizedState::Minutes(2))]),
        ]);

        let reports = ReportFormatter::default().format(&result).unwrap();
        let first_lines: Vec<&str> = reports
            .iter()
            .map(|r| r.text.lines().next().unwrap())
            .collect();
        assert_eq!(first_lines, ["Updated: 2026-10-17 08:05:09"; 2]);
        assert_eq!(reports[1].target_key, "b");
        assert!(reports[1].text.contains("站B (Inbound):"));
    }

    #[test]
    fn station_without_routes_has_header_only() {
        let result = result(vec![report("a", "站A", Direction::Outbound, &[])]);
        let reports = ReportFormatter::new("%H:%M").format(&result).unwrap();
        assert_eq!(reports[0].text, "Updated: 08:05\n站A (Outbound):");
    }

    #[test]
    fn bad_timestamp_format_is_an_error() {
        let result = result(vec![report("a", "站A", Direction::Outbound, &[])]);
        assert!(matches!(
            ReportFormatter::new("%Q").format(&result),
            Err(FormatError::TimestampFormat(f)) if f == "%Q"
        ));
    }
}
