pub mod dashboard;
pub mod error;
pub mod models;
pub mod notify;
pub mod providers;
pub mod settings;
pub mod tracking;
pub mod traffic;
mod utils;

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};

use dashboard::{render, DashboardClient};
use notify::{ConsoleNotificationHost, NotificationDispatcher};
use providers::{
    DisplaySurface, FixedLocationProvider, GoogleMapsClient, LocationProvider, LogDisplay,
};
use settings::{SettingsStore, MAPS_API_KEY_ENV};
use tracking::{commands, TrackingController};
use traffic::TrafficEvaluator;

pub use error::{LocationError, MonitorError};

pub struct AppState {
    pub settings: SettingsStore,
    pub tracking: TrackingController,
    pub dashboard: Option<DashboardClient>,
}

impl AppState {
    pub fn from_settings(settings: SettingsStore) -> Result<Self> {
        let routing = settings.routing();
        let api_key = routing.api_key.clone().ok_or_else(|| {
            anyhow!("no Maps API key configured (set {MAPS_API_KEY_ENV} or routing.api_key)")
        })?;

        let location: Arc<dyn LocationProvider> = match settings.tracking().location {
            Some(coords) => Arc::new(FixedLocationProvider::new(coords.latitude, coords.longitude)),
            None => Arc::new(FixedLocationProvider::unsupported()),
        };

        let notification_settings = settings.notifications();
        let notifier = NotificationDispatcher::new(Arc::new(ConsoleNotificationHost::new(
            notification_settings.permission,
            notification_settings.auto_grant,
        )));
        let display: Arc<dyn DisplaySurface> = Arc::new(LogDisplay);

        let evaluator = Arc::new(TrafficEvaluator::new(
            Arc::new(GoogleMapsClient::with_base_url(routing.base_url, api_key)),
            notifier.clone(),
            display.clone(),
        ));

        let tracking = TrackingController::new(location, evaluator, notifier, display);
        let dashboard = settings.dashboard_url().map(DashboardClient::new);

        Ok(Self {
            settings,
            tracking,
            dashboard,
        })
    }
}

async fn print_dashboard(client: &DashboardClient) {
    match client.list_updates().await {
        Ok(updates) => info!("Updates\n{}", render::render_updates(&updates)),
        Err(err) => warn!("Error loading updates: {err:#}"),
    }
    match client.list_topics().await {
        Ok(topics) => info!("Topics\n{}", render::render_topics(&topics)),
        Err(err) => warn!("Error loading topics: {err:#}"),
    }
}

async fn run_monitor(state: AppState) -> Result<()> {
    if let Err(err) = state.tracking.initialize().await {
        warn!("initial traffic check: {}", err);
    }

    if let Some(client) = &state.dashboard {
        print_dashboard(client).await;
    }

    // An interval given on the command line replaces the saved one once tracking starts.
    let interval = std::env::args()
        .nth(1)
        .unwrap_or_else(|| state.settings.tracking().interval_minutes.to_string());
    commands::start_tracking_and_save(&state.tracking, &state.settings, &interval)
        .await
        .map_err(|err| anyhow!(err))?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    let snapshot = commands::stop_tracking(&state.tracking)
        .await
        .map_err(|err| anyhow!(err))?;
    info!("Tracking ended in state {:?}", snapshot.status);
    Ok(())
}

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("TrafficWatch starting up...");

    let settings = SettingsStore::from_env()?;
    let state = AppState::from_settings(settings)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(run_monitor(state))
}
