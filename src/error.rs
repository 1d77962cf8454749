use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes a location provider can report for a single lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(rename_all = "camelCase")]
pub enum LocationError {
    #[error("User denied the request for geolocation.")]
    PermissionDenied,
    #[error("Location information is unavailable.")]
    PositionUnavailable,
    #[error("The request to get user location timed out.")]
    Timeout,
    #[error("An unknown error occurred.")]
    Unknown,
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Please set an interval of at least 5 minutes to avoid excessive battery usage")]
    Validation { minutes: u64 },
    #[error("Please set an interval of at most {max} minutes")]
    IntervalTooLong { minutes: u64, max: u64 },
    #[error("interval must be a whole number of minutes, got '{0}'")]
    InvalidInput(String),
    #[error("Location tracking is already running.")]
    AlreadyActive,
    #[error("Location tracking has been disabled.")]
    TrackingDisabled,
    #[error("{}", LocationError::PermissionDenied)]
    PermissionDenied,
    #[error("{}", LocationError::PositionUnavailable)]
    ProviderUnavailable,
    #[error("{}", LocationError::Timeout)]
    Timeout,
    #[error("{}", LocationError::Unknown)]
    UnknownProvider,
    #[error("Unable to find nearby destinations to check traffic.")]
    NoCandidateDestination,
    #[error("Unable to calculate route and traffic conditions. ({0})")]
    RouteComputationFailed(String),
}

impl From<LocationError> for MonitorError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::PermissionDenied => MonitorError::PermissionDenied,
            LocationError::PositionUnavailable => MonitorError::ProviderUnavailable,
            LocationError::Timeout => MonitorError::Timeout,
            LocationError::Unknown => MonitorError::UnknownProvider,
        }
    }
}
