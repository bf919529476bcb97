//! One request's worth of work: fetch every route, format, deliver.

use tracing::{error, info, warn};

use crate::aggregate::{AggregationResult, MultiRouteAggregator};
use crate::config::Settings;
use crate::domain::{RouteSource, StationTarget};
use crate::fetch::PageFetcher;
use crate::notify::{Notifier, NotifyError};
use crate::parser::RouteTableParser;
use crate::report::{FormatError, FormattedReport, ReportFormatter};

/// Sent as soon as a request is accepted.
pub const ACK_TEXT: &str = "processing";

/// Prefix of the message sent when a run fails as a whole.
pub const FAILURE_PREFIX: &str = "Sorry, failed to fetch bus information";

/// Errors that abort a run. Individual route failures never do.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("delivery failed: {0}")]
    Notify(#[from] NotifyError),
}

/// Runs aggregations over the configured routes and delivers the results.
#[derive(Debug)]
pub struct ArrivalService<F, N> {
    aggregator: MultiRouteAggregator,
    formatter: ReportFormatter,
    routes: Vec<RouteSource>,
    targets: Vec<StationTarget>,
    fetcher: F,
    notifier: N,
}

impl<F: PageFetcher, N: Notifier> ArrivalService<F, N> {
    pub fn new(settings: Settings, fetcher: F, notifier: N) -> Self {
        let parser = RouteTableParser::new(settings.tables, settings.normalizer);
        let aggregator =
            MultiRouteAggregator::new(parser, settings.fetch.timeout(), settings.time_zone);

        Self {
            aggregator,
            formatter: ReportFormatter::new(settings.timestamp_format),
            routes: settings.routes,
            targets: settings.targets,
            fetcher,
            notifier,
        }
    }

    /// Run one aggregation without formatting.
    pub async fn aggregate(&self) -> AggregationResult {
        self.aggregator
            .aggregate(&self.routes, &self.targets, &self.fetcher)
            .await
    }

    /// Run one aggregation and render every station's text.
    pub async fn collect(&self) -> Result<Vec<FormattedReport>, FormatError> {
        let result = self.aggregate().await;
        self.formatter.format(&result)
    }

    /// Tell `destination` the request is being worked on.
    pub async fn acknowledge(&self, destination: &str) -> Result<(), NotifyError> {
        self.notifier.deliver(destination, ACK_TEXT).await
    }

    /// Run one aggregation and deliver each station's text to
    /// `destination`, in target order.
    pub async fn run_for(&self, destination: &str) -> Result<(), RunError> {
        let reports = self.collect().await?;
        for report in &reports {
            self.notifier.deliver(destination, &report.text).await?;
        }
        info!(destination, stations = reports.len(), "reports delivered");
        Ok(())
    }

    /// Acknowledge, run, and report a failed run back to `destination`.
    pub async fn handle_request(&self, destination: &str) {
        if let Err(e) = self.acknowledge(destination).await {
            warn!(destination, "acknowledgement failed: {e}");
        }

        if let Err(e) = self.run_for(destination).await {
            error!(destination, "run failed: {e}");
            let text = format!("{FAILURE_PREFIX}: {e}");
            if let Err(e) = self.notifier.deliver(destination, &text).await {
                warn!(destination, "failure notice not delivered: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::domain::NormalizedState;
    use crate::fetch::MockPageFetcher;
    use crate::notify::RecordingNotifier;

    const CONFIG: &str = r#"
        [[routes]]
        url = "https://ebus.example/route/307"
        label = "307"

        [[routes]]
        url = "https://ebus.example/route/265"
        label = "265"

        [[targets]]
        key = "cks"
        name = "中正紀念堂"
        direction = "inbound"

        [[targets]]
        key = "xdal"
        name = "信義大安路口"
        direction = "outbound"
    "#;

    const PAGE_307: &str = "<html><head><title>[307] 莒光-板橋前站</title></head><body>\
        <table><tr><th>去程 往板橋</th><th></th><th>返程 往莒光</th><th></th></tr>\
        <tr><td>信義大安路口</td><td>5分</td><td>中正紀念堂</td><td>進站中</td></tr>\
        </table></body></html>";

    fn service(notifier: RecordingNotifier) -> ArrivalService<MockPageFetcher, RecordingNotifier> {
        let settings = AppConfig::from_toml_str(CONFIG).unwrap().validate().unwrap();
        let fetcher = MockPageFetcher::from_pages([("307".to_string(), PAGE_307.to_string())]);
        ArrivalService::new(settings, fetcher, notifier)
    }

    #[tokio::test]
    async fn collect_renders_every_target() {
        let reports = service(RecordingNotifier::new()).collect().await.unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].target_key, "cks");
        assert!(reports[0].text.contains("中正紀念堂 (Inbound):"));
        assert!(reports[0].text.contains("307: arriving"));
        assert!(reports[0].text.contains("265: error: no page available for 265"));
        assert!(reports[1].text.contains("307: 5 minutes away"));
    }

    #[tokio::test]
    async fn handle_request_acks_then_delivers_in_target_order() {
        let notifier = RecordingNotifier::new();
        service(notifier.clone()).handle_request("U1").await;

        let sent = notifier.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|(to, _)| to == "U1"));
        assert_eq!(sent[0].1, ACK_TEXT);
        assert!(sent[1].1.contains("中正紀念堂"));
        assert!(sent[2].1.contains("信義大安路口"));
    }

    #[tokio::test]
    async fn delivery_failure_sends_failure_notice() {
        let arrivals = service(RecordingNotifier::rejecting("信義大安路口"));
        assert!(matches!(
            arrivals.run_for("U1").await,
            Err(RunError::Notify(_))
        ));

        let notifier = RecordingNotifier::rejecting("信義大安路口");
        service(notifier.clone()).handle_request("U1").await;
        let texts = notifier.texts();
        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0], ACK_TEXT);
        assert!(texts[1].contains("中正紀念堂"));
        assert!(texts[2].starts_with("Sorry, failed to fetch bus information: delivery failed:"));
    }

    #[tokio::test]
    async fn bad_timestamp_format_sends_failure_notice() {
        let mut settings = AppConfig::from_toml_str(CONFIG).unwrap().validate().unwrap();
        settings.timestamp_format = "%Q".into();
        let fetcher = MockPageFetcher::from_pages([("307".to_string(), PAGE_307.to_string())]);
        let notifier = RecordingNotifier::new();
        let arrivals = ArrivalService::new(settings, fetcher, notifier.clone());

        assert!(matches!(
            arrivals.collect().await,
            Err(FormatError::TimestampFormat(_))
        ));

        arrivals.handle_request("U1").await;
        let texts = notifier.texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], ACK_TEXT);
        assert!(texts[1].starts_with("Sorry, failed to fetch bus information: invalid timestamp format"));
    }

    #[tokio::test]
    async fn failed_ack_does_not_stop_the_run() {
        let notifier = RecordingNotifier::rejecting(ACK_TEXT);
        service(notifier.clone()).handle_request("U1").await;
        assert_eq!(notifier.texts().len(), 2);
    }

    #[tokio::test]
    async fn sample_config_against_saved_pages() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        let settings = AppConfig::load(root.join("bus.toml")).unwrap();
        let fetcher = MockPageFetcher::new(root.join("data/mock_pages")).unwrap();
        let arrivals = ArrivalService::new(settings, fetcher, RecordingNotifier::new());

        let result = arrivals.aggregate().await;
        let cks = result.report("cks").unwrap();
        assert_eq!(cks.get("307"), Some(&NormalizedState::Approaching));
        assert_eq!(cks.get("265"), Some(&NormalizedState::Terminal));
        assert_eq!(
            cks.get("0東"),
            Some(&NormalizedState::error("no page available for 0東"))
        );

        let xdal = result.report("xdal").unwrap();
        assert_eq!(xdal.get("307"), Some(&NormalizedState::Minutes(5)));
        assert_eq!(xdal.get("265"), Some(&NormalizedState::Minutes(8)));
        assert_eq!(xdal.len(), 3);
    }
}
