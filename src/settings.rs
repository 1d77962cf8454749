use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::models::NotificationPermission;
use crate::providers::google::DEFAULT_BASE_URL;

pub const SETTINGS_PATH_ENV: &str = "TRAFFICWATCH_SETTINGS";
pub const MAPS_API_KEY_ENV: &str = "TRAFFICWATCH_MAPS_API_KEY";
pub const DEFAULT_SETTINGS_FILE: &str = "trafficwatch.json";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingSettings {
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    #[serde(default)]
    pub location: Option<Coordinates>,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            location: None,
        }
    }
}

fn default_interval_minutes() -> u64 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutingSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_routing_base_url(),
        }
    }
}

fn default_routing_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationSettings {
    #[serde(default)]
    pub permission: NotificationPermission,
    #[serde(default = "default_auto_grant")]
    pub auto_grant: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            permission: NotificationPermission::Default,
            auto_grant: true,
        }
    }
}

fn default_auto_grant() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardSettings {
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserSettings {
    #[serde(default)]
    pub tracking: TrackingSettings,
    #[serde(default)]
    pub routing: RoutingSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("Ignoring unreadable settings in {}: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn from_env() -> Result<Self> {
        let path = std::env::var(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_FILE));
        Self::new(path)
    }

    pub fn snapshot(&self) -> UserSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn tracking(&self) -> TrackingSettings {
        self.snapshot().tracking
    }

    pub fn notifications(&self) -> NotificationSettings {
        self.snapshot().notifications
    }

    pub fn dashboard_url(&self) -> Option<String> {
        self.snapshot().dashboard.base_url
    }

    pub fn routing(&self) -> RoutingSettings {
        let mut routing = self.snapshot().routing;
        if let Ok(key) = std::env::var(MAPS_API_KEY_ENV) {
            if !key.trim().is_empty() {
                routing.api_key = Some(key);
            }
        }
        routing
    }

    pub fn update_interval_minutes(&self, minutes: u64) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|e| anyhow!("settings lock poisoned: {e}"))?;
        guard.tracking.interval_minutes = minutes;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
