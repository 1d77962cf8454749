use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;
use uuid::Uuid;

use crate::models::{NotificationEvent, NotificationId, NotificationPermission};

use super::NotificationHost;

/// Notification host that writes notifications to the log.
///
/// Permission requests are answered from configuration instead of a prompt.
pub struct ConsoleNotificationHost {
    permission: Mutex<NotificationPermission>,
    auto_grant: bool,
    open: Mutex<HashSet<NotificationId>>,
}

impl ConsoleNotificationHost {
    pub fn new(permission: NotificationPermission, auto_grant: bool) -> Self {
        Self {
            permission: Mutex::new(permission),
            auto_grant,
            open: Mutex::new(HashSet::new()),
        }
    }

    pub fn open_count(&self) -> usize {
        self.open.lock().map(|open| open.len()).unwrap_or(0)
    }
}

#[async_trait]
impl NotificationHost for ConsoleNotificationHost {
    fn permission(&self) -> NotificationPermission {
        self.permission
            .lock()
            .map(|guard| *guard)
            .unwrap_or(NotificationPermission::Unsupported)
    }

    async fn request_permission(&self) -> NotificationPermission {
        let mut guard = match self.permission.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if *guard == NotificationPermission::Default {
            *guard = if self.auto_grant {
                NotificationPermission::Granted
            } else {
                NotificationPermission::Denied
            };
            info!("Notification permission resolved to {:?}", *guard);
        }
        *guard
    }

    fn show(&self, event: &NotificationEvent, _icon: &str) -> Result<NotificationId> {
        let id = Uuid::new_v4();
        self.open
            .lock()
            .map_err(|e| anyhow!("notification registry poisoned: {e}"))?
            .insert(id);
        info!("[notification] {}: {}", event.title, event.body);
        Ok(id)
    }

    fn focus_window(&self) {
        info!("[notification] focus requested");
    }

    fn close(&self, id: NotificationId) {
        if let Ok(mut open) = self.open.lock() {
            open.remove(&id);
        }
    }
}
