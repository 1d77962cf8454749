use serde::{Deserialize, Serialize};

/// Delay above which traffic counts as heavy (10 minutes).
pub const HEAVY_DELAY_SECS: i64 = 600;
/// Delay above which traffic counts as moderate (5 minutes).
pub const MODERATE_DELAY_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TrafficLevel {
    Normal,
    Moderate,
    Heavy,
}

impl TrafficLevel {
    pub fn classify(delay_secs: i64) -> Self {
        if delay_secs > HEAVY_DELAY_SECS {
            TrafficLevel::Heavy
        } else if delay_secs > MODERATE_DELAY_SECS {
            TrafficLevel::Moderate
        } else {
            TrafficLevel::Normal
        }
    }

    pub fn should_notify(&self) -> bool {
        matches!(self, TrafficLevel::Heavy)
    }

    pub fn status_message(&self, delay_secs: i64) -> String {
        match self {
            TrafficLevel::Heavy => format!(
                "Heavy traffic detected! Delay of {} minutes.",
                delay_minutes(delay_secs)
            ),
            TrafficLevel::Moderate => format!(
                "Moderate traffic. Delay of {} minutes.",
                delay_minutes(delay_secs)
            ),
            TrafficLevel::Normal => "Traffic is flowing normally.".to_string(),
        }
    }
}

/// Delay rounded to whole minutes, halves rounding up.
pub fn delay_minutes(delay_secs: i64) -> i64 {
    (delay_secs as f64 / 60.0).round() as i64
}
