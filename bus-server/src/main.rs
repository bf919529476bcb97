use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bus_server::config::AppConfig;
use bus_server::fetch::{ConfiguredFetcher, HttpPageFetcher, MockPageFetcher};
use bus_server::notify::{LineNotifier, NotifierConfig};
use bus_server::service::ArrivalService;
use bus_server::web::{AppState, create_router};

/// Config file used when `BUS_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "bus.toml";

/// Listen address used when `BIND_ADDR` is not set.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bus_server=info,tower_http=info")),
        )
        .init();

    let config_path =
        std::env::var("BUS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let settings = AppConfig::load(&config_path).expect("Failed to load configuration");
    info!(
        path = %config_path,
        routes = settings.routes.len(),
        targets = settings.targets.len(),
        "configuration loaded"
    );

    // Serve saved pages instead of the live site when a fixture dir is given
    let fetcher = match std::env::var("BUS_MOCK_PAGES") {
        Ok(dir) => {
            let mock = MockPageFetcher::new(&dir).expect("Failed to load mock pages");
            info!(dir = %dir, pages = ?mock.available(), "using mock pages");
            ConfiguredFetcher::Mock(mock)
        }
        Err(_) => ConfiguredFetcher::Http(
            HttpPageFetcher::new(&settings.fetch).expect("Failed to create page fetcher"),
        ),
    };

    let access_token = std::env::var("LINE_CHANNEL_ACCESS_TOKEN").unwrap_or_else(|_| {
        warn!("LINE_CHANNEL_ACCESS_TOKEN not set. Message delivery will fail.");
        String::new()
    });
    let notifier =
        LineNotifier::new(NotifierConfig::new(access_token)).expect("Failed to create notifier");

    let trigger_words = settings.trigger_words.clone();
    let service = ArrivalService::new(settings, fetcher, notifier);
    let app = create_router(AppState::new(service, trigger_words));

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .expect("Invalid BIND_ADDR");
    info!("Bus arrival server listening on http://{addr}");
    info!("  GET  /health    - Health check");
    info!("  POST /callback  - LINE webhook");
    info!("  GET  /report    - Run once and return station texts");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
