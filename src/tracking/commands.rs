//! Handlers behind the tracking controls, with errors flattened to display text.

use log::warn;

use crate::{notify::NotifyOutcome, settings::SettingsStore};

use super::{TrackingController, TrackingSnapshot};

pub async fn get_tracking_state(controller: &TrackingController) -> TrackingSnapshot {
    controller.snapshot().await
}

pub async fn start_tracking(
    controller: &TrackingController,
    interval_input: &str,
) -> Result<TrackingSnapshot, String> {
    controller
        .start_from_input(interval_input)
        .await
        .map_err(|e| e.to_string())
}

/// Starts tracking and, once the session is running, stores the interval as the new default.
pub async fn start_tracking_and_save(
    controller: &TrackingController,
    settings: &SettingsStore,
    interval_input: &str,
) -> Result<TrackingSnapshot, String> {
    let snapshot = start_tracking(controller, interval_input).await?;
    let minutes = snapshot.interval_ms / 60_000;
    if let Err(err) = settings.update_interval_minutes(minutes) {
        // Tracking keeps running even if the settings file cannot be written.
        warn!("Failed to save tracking interval: {err:#}");
    }
    Ok(snapshot)
}

pub async fn stop_tracking(controller: &TrackingController) -> Result<TrackingSnapshot, String> {
    Ok(controller.stop().await)
}

pub async fn test_notification(controller: &TrackingController) -> Result<(), String> {
    match controller.send_test_notification().await {
        NotifyOutcome::Shown(_) => Ok(()),
        NotifyOutcome::Unsupported => Err("Notifications are not supported".into()),
        NotifyOutcome::Denied => Err("Notification permission was denied".into()),
        NotifyOutcome::Undecided => Err("Notification permission was not granted".into()),
        NotifyOutcome::Failed => Err("Notification could not be displayed".into()),
    }
}
