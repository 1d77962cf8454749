use async_trait::async_trait;

use crate::error::LocationError;
use crate::models::{LocationOptions, Position};

use super::LocationProvider;

/// Reports a configured coordinate pair, for hosts without a positioning device.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    coordinates: Option<(f64, f64)>,
}

impl FixedLocationProvider {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            coordinates: Some((latitude, longitude)),
        }
    }

    pub fn unsupported() -> Self {
        Self { coordinates: None }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    fn is_supported(&self) -> bool {
        self.coordinates.is_some()
    }

    async fn current_position(
        &self,
        _options: &LocationOptions,
    ) -> Result<Position, LocationError> {
        let (latitude, longitude) = self
            .coordinates
            .ok_or(LocationError::PositionUnavailable)?;
        Ok(Position::now(latitude, longitude))
    }
}
