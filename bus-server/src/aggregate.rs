//! Multi-route aggregation.
//!
//! Runs the route parser over every configured route page, one route at a
//! time, and merges the results into one report per target station.
//! A route that fails (timeout, fetch error, missing table) contributes an
//! `Unknown` entry for every station instead of aborting the run, so every
//! report always has exactly one entry per route, in route order.

use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::domain::{ArrivalRecord, NormalizedState, RouteSource, StationTarget};
use crate::fetch::PageFetcher;
use crate::parser::RouteTableParser;

/// Arrivals for one target station across all routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationReport {
    pub target: StationTarget,
    entries: Vec<ArrivalRecord>,
}

impl StationReport {
    pub fn new(target: StationTarget) -> Self {
        Self {
            target,
            entries: Vec::new(),
        }
    }

    /// Build a report from entries already in route order.
    pub fn with_entries(target: StationTarget, entries: Vec<ArrivalRecord>) -> Self {
        Self { target, entries }
    }

    /// Entries in route order.
    pub fn entries(&self) -> &[ArrivalRecord] {
        &self.entries
    }

    /// State reported by the first route with this label.
    pub fn get(&self, route_label: &str) -> Option<&NormalizedState> {
        self.entries
            .iter()
            .find(|e| e.route_label == route_label)
            .map(|e| &e.state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn push(&mut self, record: ArrivalRecord) {
        debug_assert_eq!(record.target_key, self.target.key);
        self.entries.push(record);
    }
}

/// Output of one aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    /// When the run started, in the configured output zone.
    pub generated_at: DateTime<Tz>,
    /// One report per target, in target order.
    pub reports: Vec<StationReport>,
}

impl AggregationResult {
    /// Report for the target with `key`.
    pub fn report(&self, key: &str) -> Option<&StationReport> {
        self.reports.iter().find(|r| r.target.key == key)
    }
}

/// Drives the route parser across a fixed list of route pages.
#[derive(Debug, Clone)]
pub struct MultiRouteAggregator {
    parser: RouteTableParser,
    deadline: Duration,
    time_zone: Tz,
}

impl MultiRouteAggregator {
    /// Create an aggregator.
    ///
    /// `deadline` bounds each route's fetch; `time_zone` is the zone the
    /// run timestamp is reported in.
    pub fn new(parser: RouteTableParser, deadline: Duration, time_zone: Tz) -> Self {
        Self {
            parser,
            deadline,
            time_zone,
        }
    }

    /// Run one aggregation over `sources` for `targets`.
    ///
    /// Routes are fetched sequentially and never retried.
    pub async fn aggregate<F: PageFetcher>(
        &self,
        sources: &[RouteSource],
        targets: &[StationTarget],
        fetcher: &F,
    ) -> AggregationResult {
        let generated_at = Utc::now().with_timezone(&self.time_zone);
        let mut reports: Vec<StationReport> =
            targets.iter().cloned().map(StationReport::new).collect();
        let mut failed_routes = 0;

        for source in sources {
            let (records, ok) = self.collect_route(source, targets, fetcher).await;
            if !ok {
                failed_routes += 1;
            }
            for (report, record) in reports.iter_mut().zip(records) {
                report.push(record);
            }
        }

        info!(
            routes = sources.len(),
            failed_routes,
            targets = targets.len(),
            "aggregation run complete"
        );

        AggregationResult {
            generated_at,
            reports,
        }
    }

    /// Records for one route, one per target. The flag is false when the
    /// route failed as a whole.
    ///
    /// A configured label names the route whether or not it loaded; the
    /// page title is only used for routes without one.
    async fn collect_route<F: PageFetcher>(
        &self,
        source: &RouteSource,
        targets: &[StationTarget],
        fetcher: &F,
    ) -> (Vec<ArrivalRecord>, bool) {
        debug!(url = %source.url, "fetching route");

        let failure = match tokio::time::timeout(self.deadline, fetcher.fetch(source)).await {
            Err(_) => {
                warn!(url = %source.url, deadline = ?self.deadline, "route fetch timed out");
                NormalizedState::timeout()
            }
            Ok(Err(e)) if e.is_timeout() => {
                warn!(url = %source.url, "route fetch timed out: {e}");
                NormalizedState::timeout()
            }
            Ok(Err(e)) => {
                warn!(url = %source.url, "route fetch failed: {e}");
                NormalizedState::error(&e)
            }
            Ok(Ok(doc)) => match self.parser.parse(&doc, targets) {
                Ok(parsed) => {
                    let records = match &source.label {
                        Some(label) => parsed
                            .records
                            .into_iter()
                            .map(|r| ArrivalRecord {
                                route_label: label.clone(),
                                ..r
                            })
                            .collect(),
                        _ => parsed.records,
                    };
                    return (records, true);
                }
                Err(e) => {
                    warn!(url = %source.url, "route page unusable: {e}");
                    NormalizedState::error(&e)
                }
            },
        };

        let records = targets
            .iter()
            .map(|t| ArrivalRecord::synthesized(source.display_label(), &t.key, failure.clone()))
            .collect();
        (records, false)
    }
}
