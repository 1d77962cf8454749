#![allow(dead_code)]

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::{rngs::StdRng, SeedableRng};
use uuid::Uuid;

use trafficwatch_lib::{
    error::LocationError,
    models::{LocationOptions, NotificationEvent, NotificationId, NotificationPermission, Position},
    notify::{NotificationDispatcher, NotificationHost},
    providers::{DisplaySurface, LocationProvider, PointOfInterest, RouteEstimate, RouteStatus, RoutingProvider},
    tracking::TrackingController,
    traffic::TrafficEvaluator,
};

pub struct ScriptedLocation {
    pub supported: bool,
    pub result: Mutex<Result<(f64, f64), LocationError>>,
    pub lookups: AtomicUsize,
}

impl ScriptedLocation {
    pub fn at(latitude: f64, longitude: f64) -> Arc<Self> {
        Arc::new(Self {
            supported: true,
            result: Mutex::new(Ok((latitude, longitude))),
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: LocationError) -> Arc<Self> {
        Arc::new(Self {
            supported: true,
            result: Mutex::new(Err(error)),
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn unsupported() -> Arc<Self> {
        Arc::new(Self {
            supported: false,
            result: Mutex::new(Err(LocationError::PositionUnavailable)),
            lookups: AtomicUsize::new(0),
        })
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_result(&self, result: Result<(f64, f64), LocationError>) {
        *self.result.lock().unwrap() = result;
    }
}

#[async_trait]
impl LocationProvider for ScriptedLocation {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn current_position(&self, options: &LocationOptions) -> Result<Position, LocationError> {
        assert!(options.high_accuracy);
        assert_eq!(options.timeout.as_secs(), 10);
        assert!(options.max_age.is_zero());
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let (lat, lng) = (*self.result.lock().unwrap())?;
        Ok(Position::now(lat, lng))
    }
}

/// Answers every lookup only after `delay`, counting lookups begun and finished.
pub struct SlowLocation {
    pub delay: Duration,
    pub started: AtomicUsize,
    pub finished: AtomicUsize,
}

impl SlowLocation {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            started: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
        })
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for SlowLocation {
    async fn current_position(&self, _options: &LocationOptions) -> Result<Position, LocationError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(Position::now(40.4, -3.7))
    }
}

pub struct FakeRouting {
    pub candidates: Mutex<Result<Vec<PointOfInterest>, String>>,
    pub normal_secs: i64,
    pub delay_secs: Mutex<i64>,
    pub status: Mutex<RouteStatus>,
    pub searches: AtomicUsize,
    pub routed_to: Mutex<Vec<Position>>,
}

impl FakeRouting {
    pub fn with_delay(delay_secs: i64) -> Arc<Self> {
        Arc::new(Self {
            candidates: Mutex::new(Ok(points(3))),
            normal_secs: 900,
            delay_secs: Mutex::new(delay_secs),
            status: Mutex::new(RouteStatus::Ok),
            searches: AtomicUsize::new(0),
            routed_to: Mutex::new(Vec::new()),
        })
    }

    pub fn set_delay(&self, delay_secs: i64) {
        *self.delay_secs.lock().unwrap() = delay_secs;
    }

    pub fn set_candidates(&self, candidates: Result<Vec<PointOfInterest>, String>) {
        *self.candidates.lock().unwrap() = candidates;
    }

    pub fn set_status(&self, status: RouteStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn routes(&self) -> usize {
        self.routed_to.lock().unwrap().len()
    }
}

pub fn points(n: usize) -> Vec<PointOfInterest> {
    (0..n)
        .map(|i| PointOfInterest {
            name: format!("Place {i}"),
            position: Position::now(40.0 + i as f64 / 100.0, -3.7),
        })
        .collect()
}

#[async_trait]
impl RoutingProvider for FakeRouting {
    async fn nearby_points_of_interest(
        &self,
        _center: &Position,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<PointOfInterest>> {
        assert_eq!(radius_meters, 5_000);
        assert_eq!(category, "point_of_interest");
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.candidates.lock().unwrap().clone().map_err(|e| anyhow!(e))
    }

    async fn compute_route(
        &self,
        _origin: &Position,
        destination: &Position,
        _departure_time: DateTime<Utc>,
    ) -> Result<RouteEstimate> {
        self.routed_to.lock().unwrap().push(*destination);
        let status = self.status.lock().unwrap().clone();
        if status != RouteStatus::Ok {
            return Ok(RouteEstimate::failed(match status {
                RouteStatus::Failed(s) => s,
                RouteStatus::Ok => unreachable!(),
            }));
        }
        let delay = *self.delay_secs.lock().unwrap();
        Ok(RouteEstimate {
            status,
            normal_duration_secs: self.normal_secs,
            traffic_duration_secs: self.normal_secs + delay,
            normal_duration_text: format!("{} mins", self.normal_secs / 60),
            traffic_duration_text: format!("{} mins", (self.normal_secs + delay) / 60),
            distance_text: "4.2 km".into(),
            end_address: "Gran Via, 28, Madrid, Spain".into(),
        })
    }
}

pub struct RecordingHost {
    pub permission: Mutex<NotificationPermission>,
    pub shown: Mutex<Vec<NotificationEvent>>,
    pub prompts: AtomicUsize,
}

impl RecordingHost {
    pub fn new(permission: NotificationPermission) -> Arc<Self> {
        Arc::new(Self {
            permission: Mutex::new(permission),
            shown: Mutex::new(Vec::new()),
            prompts: AtomicUsize::new(0),
        })
    }

    pub fn titles(&self) -> Vec<String> {
        self.shown.lock().unwrap().iter().map(|e| e.title.clone()).collect()
    }

    pub fn count_titled(&self, title: &str) -> usize {
        self.titles().iter().filter(|t| t.as_str() == title).count()
    }
}

#[async_trait]
impl NotificationHost for RecordingHost {
    fn permission(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> NotificationPermission {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        let mut permission = self.permission.lock().unwrap();
        if *permission == NotificationPermission::Default {
            *permission = NotificationPermission::Granted;
        }
        *permission
    }

    fn show(&self, event: &NotificationEvent, _icon: &str) -> Result<NotificationId> {
        self.shown.lock().unwrap().push(event.clone());
        Ok(Uuid::new_v4())
    }

    fn focus_window(&self) {}

    fn close(&self, _id: NotificationId) {}
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub location: Mutex<Vec<String>>,
    pub last_updated: Mutex<Vec<String>>,
    pub traffic: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
}

impl RecordingDisplay {
    pub fn last_traffic(&self) -> Option<String> {
        self.traffic.lock().unwrap().last().cloned()
    }

    pub fn last_location(&self) -> Option<String> {
        self.location.lock().unwrap().last().cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn show_location(&self, text: &str) {
        self.location.lock().unwrap().push(text.to_string());
    }

    fn show_last_updated(&self, text: &str) {
        self.last_updated.lock().unwrap().push(text.to_string());
    }

    fn show_traffic(&self, text: &str) {
        self.traffic.lock().unwrap().push(text.to_string());
    }

    fn alert(&self, text: &str) {
        self.alerts.lock().unwrap().push(text.to_string());
    }
}

pub struct Harness<L = ScriptedLocation> {
    pub location: Arc<L>,
    pub routing: Arc<FakeRouting>,
    pub host: Arc<RecordingHost>,
    pub display: Arc<RecordingDisplay>,
    pub evaluator: Arc<TrafficEvaluator>,
    pub controller: TrackingController,
}

impl<L: LocationProvider + 'static> Harness<L> {
    pub fn new(location: Arc<L>, routing: Arc<FakeRouting>) -> Self {
        Self::with_host(location, routing, RecordingHost::new(NotificationPermission::Granted))
    }

    pub fn with_host(
        location: Arc<L>,
        routing: Arc<FakeRouting>,
        host: Arc<RecordingHost>,
    ) -> Self {
        let display = Arc::new(RecordingDisplay::default());
        let notifier = NotificationDispatcher::new(host.clone());
        let evaluator = Arc::new(TrafficEvaluator::with_rng(
            routing.clone(),
            notifier.clone(),
            display.clone(),
            StdRng::seed_from_u64(42),
        ));
        let controller =
            TrackingController::new(location.clone(), evaluator.clone(), notifier, display.clone());

        Self {
            location,
            routing,
            host,
            display,
            evaluator,
            controller,
        }
    }
}
