pub mod display;
pub mod fixed;
pub mod google;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LocationError;
use crate::models::{LocationOptions, Position};

pub use display::LogDisplay;
pub use fixed::FixedLocationProvider;
pub use google::GoogleMapsClient;

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Whether the host can produce positions at all.
    fn is_supported(&self) -> bool {
        true
    }

    async fn current_position(&self, options: &LocationOptions)
        -> Result<Position, LocationError>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RouteStatus {
    Ok,
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteEstimate {
    pub status: RouteStatus,
    pub normal_duration_secs: i64,
    pub traffic_duration_secs: i64,
    pub normal_duration_text: String,
    pub traffic_duration_text: String,
    pub distance_text: String,
    pub end_address: String,
}

impl RouteEstimate {
    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            status: RouteStatus::Failed(status.into()),
            normal_duration_secs: 0,
            traffic_duration_secs: 0,
            normal_duration_text: String::new(),
            traffic_duration_text: String::new(),
            distance_text: String::new(),
            end_address: String::new(),
        }
    }
}

#[async_trait]
pub trait RoutingProvider: Send + Sync {
    async fn nearby_points_of_interest(
        &self,
        center: &Position,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<PointOfInterest>>;

    async fn compute_route(
        &self,
        origin: &Position,
        destination: &Position,
        departure_time: DateTime<Utc>,
    ) -> Result<RouteEstimate>;
}

/// Where human readable status text ends up.
pub trait DisplaySurface: Send + Sync {
    fn show_location(&self, text: &str);
    fn show_last_updated(&self, text: &str);
    fn show_traffic(&self, text: &str);
    fn alert(&self, text: &str);
}
