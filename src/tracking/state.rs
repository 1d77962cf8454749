use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TrackingStatus {
    Idle,
    Active,
    /// Terminal. Location permission was denied or geolocation is missing.
    Disabled,
}

impl Default for TrackingStatus {
    fn default() -> Self {
        TrackingStatus::Idle
    }
}

/// Handle to the repeating lookup task.
pub struct TimerHandle {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl TimerHandle {
    pub fn new(handle: JoinHandle<()>, cancel_token: CancellationToken) -> Self {
        Self {
            handle,
            cancel_token,
        }
    }

    /// Stops the timer and waits for its task to exit, so no tick can fire afterwards.
    /// Lookups that were already dispatched keep running.
    pub async fn shutdown(self) {
        self.cancel_token.cancel();
        self.handle.abort();
        match self.handle.await {
            Ok(()) => {}
            Err(err) if err.is_cancelled() => {}
            Err(err) => error!("tracking timer task failed: {err:?}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSnapshot {
    pub status: TrackingStatus,
    pub interval_ms: u64,
    pub started_at: Option<DateTime<Utc>>,
}

/// Poller state. `ticker` is present exactly while `status` is `Active`.
#[derive(Default)]
pub struct TrackingSession {
    status: TrackingStatus,
    interval_ms: u64,
    started_at: Option<DateTime<Utc>>,
    ticker: Option<TimerHandle>,
}

impl TrackingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> TrackingStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == TrackingStatus::Active
    }

    pub fn has_timer(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn begin(&mut self, interval_ms: u64, ticker: TimerHandle, started_at: DateTime<Utc>) {
        debug_assert_eq!(self.status, TrackingStatus::Idle);
        self.status = TrackingStatus::Active;
        self.interval_ms = interval_ms;
        self.started_at = Some(started_at);
        self.ticker = Some(ticker);
    }

    /// Active -> Idle. Returns the timer to shut down, `None` when nothing was running.
    pub fn end(&mut self) -> Option<TimerHandle> {
        if self.status != TrackingStatus::Active {
            return None;
        }
        self.status = TrackingStatus::Idle;
        self.started_at = None;
        self.ticker.take()
    }

    /// Any state -> Disabled. There is no way back.
    pub fn disable(&mut self) -> Option<TimerHandle> {
        self.status = TrackingStatus::Disabled;
        self.started_at = None;
        self.ticker.take()
    }

    pub fn snapshot(&self) -> TrackingSnapshot {
        TrackingSnapshot {
            status: self.status,
            interval_ms: self.interval_ms,
            started_at: self.started_at,
        }
    }
}
