//! Lorawatch console - LoRaWAN network monitoring service
//!
//! Polls The Things Network for applications, devices, gateways, and stored
//! uplinks, and serves the aggregated view over a JSON dashboard.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod metrics;
pub mod overview;
pub mod subscription;

pub use config::{load_config, Config};
pub use error::{ConsoleError, Result};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use ttn_client::auth::NoToken;
use ttn_client::io::ReqwestHttpClient;
use ttn_client::{ClientConfig, TtnClient};

use crate::dashboard::DashboardState;
use crate::metrics::{MetricsSource, SimulatedMetrics};
use crate::subscription::Subscription;

/// Run the console service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let mut client_config = ClientConfig::from_env();
    client_config.merge(config.ttn.clone().into_overrides());
    let client = Arc::new(TtnClient::new(
        client_config,
        Arc::new(ReqwestHttpClient::new()),
        Arc::new(NoToken),
    ));
    let metrics: Arc<dyn MetricsSource> = Arc::new(SimulatedMetrics);
    let cancel = CancellationToken::new();

    let refresh_interval = Duration::from_millis(config.refresh_interval_ms);
    let health_interval = Duration::from_millis(config.health_interval_ms);
    let message_limit = config.message_limit;

    let overview = {
        let client = Arc::clone(&client);
        let metrics = Arc::clone(&metrics);
        Arc::new(Subscription::start(
            move || {
                let client = Arc::clone(&client);
                let metrics = Arc::clone(&metrics);
                async move { overview::fetch_overview(&client, metrics.as_ref()).await }
            },
            refresh_interval,
            config.auto_refresh,
        ))
    };

    let devices = {
        let client = Arc::clone(&client);
        Arc::new(Subscription::start(
            move || {
                let client = Arc::clone(&client);
                async move { overview::fetch_all_devices(&client).await }
            },
            refresh_interval,
            config.auto_refresh,
        ))
    };

    let gateways = {
        let client = Arc::clone(&client);
        Arc::new(Subscription::start(
            move || {
                let client = Arc::clone(&client);
                async move { Ok::<_, ConsoleError>(client.gateways(None).await?) }
            },
            refresh_interval,
            config.auto_refresh,
        ))
    };

    let messages = {
        let client = Arc::clone(&client);
        Arc::new(Subscription::start(
            move || {
                let client = Arc::clone(&client);
                async move { overview::fetch_recent_messages(&client, message_limit).await }
            },
            refresh_interval,
            config.auto_refresh,
        ))
    };

    let health = {
        let client = Arc::clone(&client);
        Arc::new(Subscription::start(
            move || {
                let client = Arc::clone(&client);
                async move { Ok::<_, ConsoleError>(client.health_check().await) }
            },
            health_interval,
            config.auto_refresh,
        ))
    };

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Start dashboard if enabled
    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let dashboard_state = DashboardState {
            overview: Arc::clone(&overview),
            devices: Arc::clone(&devices),
            gateways: Arc::clone(&gateways),
            messages: Arc::clone(&messages),
            health: Arc::clone(&health),
            refresh_interval_ms: config.refresh_interval_ms,
            timezone: config.timezone.clone(),
        };
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            let router = dashboard::build_router(dashboard_state);
            let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
            tracing::info!("Dashboard listening on http://{}", addr);

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                        dashboard_port,
                        e
                    );
                    return;
                }
            };

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    tracing::info!(
        "Console started against {}",
        client.config().base_url
    );

    // Block until cancelled
    cancel.cancelled().await;

    overview.stop();
    devices.stop();
    gateways.stop();
    messages.stop();
    health.stop();
    tracing::info!("Console stopped");

    Ok(())
}
