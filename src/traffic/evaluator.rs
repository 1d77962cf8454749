use std::sync::{Arc, Mutex};

use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::{
    error::MonitorError,
    models::Position,
    notify::NotificationDispatcher,
    providers::{DisplaySurface, PointOfInterest, RouteStatus, RoutingProvider},
};

use super::TrafficLevel;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

pub const SEARCH_RADIUS_METERS: u32 = 5_000;
pub const DESTINATION_CATEGORY: &str = "point_of_interest";
/// Only the first few search hits are considered as destinations.
pub const CANDIDATE_WINDOW: usize = 5;
pub const TRAFFIC_ALERT_TITLE: &str = "Traffic Alert";

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficAssessment {
    pub destination: Position,
    pub destination_name: String,
    pub normal_duration_secs: i64,
    pub traffic_duration_secs: i64,
    pub delay_secs: i64,
    pub level: TrafficLevel,
    pub distance_text: String,
    pub normal_duration_text: String,
    pub traffic_duration_text: String,
}

impl TrafficAssessment {
    pub fn status_message(&self) -> String {
        self.level.status_message(self.delay_secs)
    }

    /// Multi-line text for the display surface.
    pub fn summary(&self) -> String {
        format!(
            "Destination: {}\nDistance: {}\nNormal duration: {}\nDuration in traffic: {}\nStatus: {}",
            self.destination_name,
            self.distance_text,
            self.normal_duration_text,
            self.traffic_duration_text,
            self.status_message()
        )
    }
}

pub struct TrafficEvaluator {
    routing: Arc<dyn RoutingProvider>,
    notifier: NotificationDispatcher,
    display: Arc<dyn DisplaySurface>,
    rng: Mutex<StdRng>,
}

impl TrafficEvaluator {
    pub fn new(
        routing: Arc<dyn RoutingProvider>,
        notifier: NotificationDispatcher,
        display: Arc<dyn DisplaySurface>,
    ) -> Self {
        Self::with_rng(routing, notifier, display, StdRng::from_entropy())
    }

    pub fn with_rng(
        routing: Arc<dyn RoutingProvider>,
        notifier: NotificationDispatcher,
        display: Arc<dyn DisplaySurface>,
        rng: StdRng,
    ) -> Self {
        Self {
            routing,
            notifier,
            display,
            rng: Mutex::new(rng),
        }
    }

    /// Checks traffic from `origin` towards a random nearby destination.
    ///
    /// Raises one "Traffic Alert" notification when the delay is heavy.
    pub async fn evaluate(&self, origin: &Position) -> Result<TrafficAssessment, MonitorError> {
        let candidates = match self
            .routing
            .nearby_points_of_interest(origin, SEARCH_RADIUS_METERS, DESTINATION_CATEGORY)
            .await
        {
            Ok(candidates) => candidates,
            Err(err) => {
                log_warn!("nearby search failed: {err:?}");
                Vec::new()
            }
        };

        let Some(destination) = self.pick_destination(&candidates) else {
            let err = MonitorError::NoCandidateDestination;
            self.display.show_traffic(&err.to_string());
            return Err(err);
        };

        let route = match self
            .routing
            .compute_route(origin, &destination.position, Utc::now())
            .await
        {
            Ok(route) => route,
            Err(err) => {
                log_warn!("route request failed: {err:?}");
                return Err(self.route_failed(err.to_string()));
            }
        };

        if let RouteStatus::Failed(status) = &route.status {
            return Err(self.route_failed(status.clone()));
        }

        let delay_secs = route.traffic_duration_secs - route.normal_duration_secs;
        let level = TrafficLevel::classify(delay_secs);

        let destination_name = route
            .end_address
            .split(',')
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(destination.name.as_str())
            .to_string();

        let assessment = TrafficAssessment {
            destination: destination.position,
            destination_name,
            normal_duration_secs: route.normal_duration_secs,
            traffic_duration_secs: route.traffic_duration_secs,
            delay_secs,
            level,
            distance_text: route.distance_text,
            normal_duration_text: route.normal_duration_text,
            traffic_duration_text: route.traffic_duration_text,
        };

        log_info!(
            "traffic towards {}: delay {}s ({:?})",
            assessment.destination_name,
            delay_secs,
            level
        );

        if level.should_notify() {
            let outcome = self
                .notifier
                .notify(TRAFFIC_ALERT_TITLE, &assessment.status_message())
                .await;
            log_info!("traffic alert dispatch: {:?}", outcome);
        }

        self.display.show_traffic(&assessment.summary());

        Ok(assessment)
    }

    fn pick_destination<'a>(&self, candidates: &'a [PointOfInterest]) -> Option<&'a PointOfInterest> {
        let window = candidates.len().min(CANDIDATE_WINDOW);
        if window == 0 {
            return None;
        }
        let index = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..window),
            Err(poisoned) => poisoned.into_inner().gen_range(0..window),
        };
        candidates.get(index)
    }

    fn route_failed(&self, reason: String) -> MonitorError {
        self.display
            .show_traffic("Unable to calculate route and traffic conditions.");
        MonitorError::RouteComputationFailed(reason)
    }
}
