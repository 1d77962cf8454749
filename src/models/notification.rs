use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationEvent {
    pub title: String,
    pub body: String,
}

impl NotificationEvent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NotificationPermission {
    Unsupported,
    Granted,
    Denied,
    /// Not yet decided by the user.
    Default,
}

impl Default for NotificationPermission {
    fn default() -> Self {
        NotificationPermission::Default
    }
}

pub type NotificationId = Uuid;
