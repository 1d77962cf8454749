use std::sync::Arc;

use chrono::{Local, Utc};
use tokio::{
    sync::Mutex,
    time::{self, Duration, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{LocationError, MonitorError},
    models::{LocationOptions, NotificationPermission, Position},
    notify::{NotificationDispatcher, NotifyOutcome},
    providers::{DisplaySurface, LocationProvider},
    traffic::{TrafficAssessment, TrafficEvaluator},
};

use super::{TimerHandle, TrackingSession, TrackingSnapshot, TrackingStatus};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

pub const MIN_INTERVAL_MINUTES: u64 = 5;
pub const MAX_INTERVAL_MINUTES: u64 = 24 * 60;
const MS_PER_MINUTE: u64 = 60_000;

const STARTED_TITLE: &str = "Location Tracking Started";
const STARTED_BODY: &str = "You will receive traffic updates based on your location.";
const STOPPED_TITLE: &str = "Location Tracking Stopped";
const STOPPED_BODY: &str = "You will no longer receive traffic updates.";
const TEST_TITLE: &str = "Test Notification";
const TEST_BODY: &str =
    "This is a test notification. If you see this, notifications are working correctly!";

#[derive(Clone)]
pub struct TrackingController {
    session: Arc<Mutex<TrackingSession>>,
    location: Arc<dyn LocationProvider>,
    evaluator: Arc<TrafficEvaluator>,
    notifier: NotificationDispatcher,
    display: Arc<dyn DisplaySurface>,
    options: LocationOptions,
}

impl TrackingController {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        evaluator: Arc<TrafficEvaluator>,
        notifier: NotificationDispatcher,
        display: Arc<dyn DisplaySurface>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(TrackingSession::new())),
            location,
            evaluator,
            notifier,
            display,
            options: LocationOptions::default(),
        }
    }

    pub async fn snapshot(&self) -> TrackingSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Startup checks plus one lookup outside of any session.
    pub async fn initialize(&self) -> Result<TrafficAssessment, MonitorError> {
        if !self.location.is_supported() {
            self.display
                .alert("Geolocation is not supported by your browser");
            self.disable().await;
            return Err(MonitorError::TrackingDisabled);
        }

        match self.notifier.permission() {
            NotificationPermission::Unsupported => {
                self.display
                    .alert("Notifications are not supported by your browser");
            }
            NotificationPermission::Default => {
                let decided = self.notifier.request_permission().await;
                log_info!("notification permission after prompt: {:?}", decided);
            }
            NotificationPermission::Granted | NotificationPermission::Denied => {}
        }

        self.lookup().await
    }

    /// Parses the interval field as typed by the user and starts tracking.
    pub async fn start_from_input(&self, input: &str) -> Result<TrackingSnapshot, MonitorError> {
        let minutes = match input.trim().parse::<u64>() {
            Ok(minutes) => minutes,
            Err(_) => return Err(self.report(MonitorError::InvalidInput(input.trim().to_string()))),
        };
        self.start(minutes).await
    }

    pub async fn start(&self, interval_minutes: u64) -> Result<TrackingSnapshot, MonitorError> {
        let interval_ms = interval_minutes.saturating_mul(MS_PER_MINUTE);

        if interval_ms < MIN_INTERVAL_MINUTES * MS_PER_MINUTE {
            return Err(self.report(MonitorError::Validation {
                minutes: interval_minutes,
            }));
        }
        if interval_minutes > MAX_INTERVAL_MINUTES {
            return Err(self.report(MonitorError::IntervalTooLong {
                minutes: interval_minutes,
                max: MAX_INTERVAL_MINUTES,
            }));
        }

        let snapshot = {
            let mut session = self.session.lock().await;
            match session.status() {
                TrackingStatus::Active => {
                    log_warn!("start requested while tracking is already active");
                    return Err(self.report(MonitorError::AlreadyActive));
                }
                TrackingStatus::Disabled => {
                    return Err(self.report(MonitorError::TrackingDisabled))
                }
                TrackingStatus::Idle => {}
            }

            // Lookups spawned here cannot touch the session until the lock is released.
            self.spawn_lookup();
            let ticker = self.spawn_ticker(Duration::from_millis(interval_ms));
            session.begin(interval_ms, ticker, Utc::now());
            session.snapshot()
        };

        log_info!("tracking started, every {} minutes", interval_minutes);
        self.notifier.notify(STARTED_TITLE, STARTED_BODY).await;

        Ok(snapshot)
    }

    pub async fn stop(&self) -> TrackingSnapshot {
        let (stopped, snapshot) = {
            let mut session = self.session.lock().await;
            let stopped = match session.end() {
                Some(ticker) => {
                    ticker.shutdown().await;
                    true
                }
                None => false,
            };
            (stopped, session.snapshot())
        };

        if stopped {
            log_info!("tracking stopped");
            self.notifier.notify(STOPPED_TITLE, STOPPED_BODY).await;
        }

        snapshot
    }

    pub async fn send_test_notification(&self) -> NotifyOutcome {
        self.notifier.notify(TEST_TITLE, TEST_BODY).await
    }

    /// One request to the location provider, routed to the update or error path.
    pub async fn lookup(&self) -> Result<TrafficAssessment, MonitorError> {
        match self.location.current_position(&self.options).await {
            Ok(position) => self.on_location_update(position).await,
            Err(err) => Err(self.on_location_error(err).await),
        }
    }

    pub async fn on_location_update(
        &self,
        position: Position,
    ) -> Result<TrafficAssessment, MonitorError> {
        self.display.show_location(&format!(
            "Lat: {:.6}, Lng: {:.6}",
            position.latitude, position.longitude
        ));
        self.display.show_last_updated(&format!(
            "Last updated: {}",
            Local::now().format("%H:%M:%S")
        ));

        self.evaluator.evaluate(&position).await
    }

    pub async fn on_location_error(&self, error: LocationError) -> MonitorError {
        self.display.show_location(&format!("Error: {}", error));
        log_error!("geolocation error: {:?}", error);

        if error == LocationError::PermissionDenied {
            self.disable().await;
        }

        MonitorError::from(error)
    }

    /// Puts the error in front of the user and hands it back.
    fn report(&self, err: MonitorError) -> MonitorError {
        self.display.alert(&err.to_string());
        err
    }

    async fn disable(&self) {
        let ticker = self.session.lock().await.disable();
        if let Some(ticker) = ticker {
            ticker.shutdown().await;
        }
        log_warn!("location tracking disabled until restart");
    }

    fn spawn_lookup(&self) {
        let controller = self.clone();
        tokio::spawn(async move {
            if let Err(err) = controller.lookup().await {
                log_warn!("lookup finished without traffic data: {}", err);
            }
        });
    }

    fn spawn_ticker(&self, period: Duration) -> TimerHandle {
        let cancel_token = CancellationToken::new();
        let token = cancel_token.clone();
        let controller = self.clone();
        let first_tick = Instant::now() + period;

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(first_tick, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => controller.spawn_lookup(),
                }
            }
        });

        TimerHandle::new(handle, cancel_token)
    }
}
