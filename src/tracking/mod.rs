pub mod commands;
pub mod controller;
pub mod state;

pub use controller::TrackingController;
pub use state::{TimerHandle, TrackingSession, TrackingSnapshot, TrackingStatus};
