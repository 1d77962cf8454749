use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateSummary {
    pub filename: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub num_chats: u64,
    #[serde(default)]
    pub num_updates: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Topic {
    pub name: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub sources: Vec<Value>,
    #[serde(default)]
    pub new_materials: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSummary {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub messages: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Material {
    #[serde(default)]
    pub title: Option<String>,
    /// Usually an ISO date string, but the backend passes through whatever the source gave.
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateDetail {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub chats: Vec<ChatSummary>,
    #[serde(default)]
    pub topic_updates: BTreeMap<String, Vec<Material>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailResult {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl EmailResult {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Backend timestamps come either as RFC 3339 or as naive ISO-8601 (no offset).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}
