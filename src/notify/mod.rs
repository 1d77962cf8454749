pub mod console;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use serde::Serialize;

use crate::models::{NotificationEvent, NotificationId, NotificationPermission};

pub use console::ConsoleNotificationHost;

pub const NOTIFICATION_ICON: &str = "https://maps.google.com/mapfiles/ms/icons/red-dot.png";

#[async_trait]
pub trait NotificationHost: Send + Sync {
    fn permission(&self) -> NotificationPermission;

    /// Prompts the user; resolves to whatever they decided.
    async fn request_permission(&self) -> NotificationPermission;

    fn show(&self, event: &NotificationEvent, icon: &str) -> Result<NotificationId>;

    fn focus_window(&self);

    fn close(&self, id: NotificationId);
}

/// Result of a single `notify` attempt.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NotifyOutcome {
    Shown(NotificationId),
    Unsupported,
    Denied,
    /// The permission prompt was dismissed without a decision.
    Undecided,
    Failed,
}

impl NotifyOutcome {
    pub fn is_shown(&self) -> bool {
        matches!(self, NotifyOutcome::Shown(_))
    }
}

#[derive(Clone)]
pub struct NotificationDispatcher {
    host: Arc<dyn NotificationHost>,
}

impl NotificationDispatcher {
    pub fn new(host: Arc<dyn NotificationHost>) -> Self {
        Self { host }
    }

    pub fn permission(&self) -> NotificationPermission {
        self.host.permission()
    }

    pub async fn request_permission(&self) -> NotificationPermission {
        self.host.request_permission().await
    }

    pub async fn notify(&self, title: &str, body: &str) -> NotifyOutcome {
        let event = NotificationEvent::new(title, body);

        match self.host.permission() {
            NotificationPermission::Unsupported => {
                info!("Notifications not supported, dropping '{}'", event.title);
                NotifyOutcome::Unsupported
            }
            NotificationPermission::Granted => self.display(&event),
            NotificationPermission::Denied => NotifyOutcome::Denied,
            NotificationPermission::Default => {
                // One prompt, one retry. Nothing is queued past this point.
                match self.host.request_permission().await {
                    NotificationPermission::Granted => self.display(&event),
                    NotificationPermission::Default => NotifyOutcome::Undecided,
                    NotificationPermission::Unsupported => NotifyOutcome::Unsupported,
                    NotificationPermission::Denied => NotifyOutcome::Denied,
                }
            }
        }
    }

    /// Click on a displayed notification: bring the app forward, dismiss it.
    pub fn handle_click(&self, id: NotificationId) {
        self.host.focus_window();
        self.host.close(id);
    }

    fn display(&self, event: &NotificationEvent) -> NotifyOutcome {
        match self.host.show(event, NOTIFICATION_ICON) {
            Ok(id) => NotifyOutcome::Shown(id),
            Err(err) => {
                error!("Failed to show notification '{}': {err:?}", event.title);
                NotifyOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct FakeHost {
        permission: Mutex<NotificationPermission>,
        answer: NotificationPermission,
        shown: Mutex<Vec<NotificationEvent>>,
        requests: Mutex<u32>,
        focused: Mutex<u32>,
        closed: Mutex<Vec<NotificationId>>,
    }

    impl FakeHost {
        fn new(permission: NotificationPermission, answer: NotificationPermission) -> Arc<Self> {
            Arc::new(Self {
                permission: Mutex::new(permission),
                answer,
                shown: Mutex::new(Vec::new()),
                requests: Mutex::new(0),
                focused: Mutex::new(0),
                closed: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl NotificationHost for FakeHost {
        fn permission(&self) -> NotificationPermission {
            *self.permission.lock().unwrap()
        }

        async fn request_permission(&self) -> NotificationPermission {
            *self.requests.lock().unwrap() += 1;
            *self.permission.lock().unwrap() = self.answer;
            self.answer
        }

        fn show(&self, event: &NotificationEvent, icon: &str) -> Result<NotificationId> {
            assert_eq!(icon, NOTIFICATION_ICON);
            self.shown.lock().unwrap().push(event.clone());
            Ok(Uuid::new_v4())
        }

        fn focus_window(&self) {
            *self.focused.lock().unwrap() += 1;
        }

        fn close(&self, id: NotificationId) {
            self.closed.lock().unwrap().push(id);
        }
    }

    #[tokio::test]
    async fn granted_shows_immediately() {
        let host = FakeHost::new(NotificationPermission::Granted, NotificationPermission::Granted);
        let dispatcher = NotificationDispatcher::new(host.clone());

        let outcome = dispatcher.notify("Traffic Alert", "slow").await;

        assert!(outcome.is_shown());
        assert_eq!(*host.requests.lock().unwrap(), 0);
        assert_eq!(host.shown.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn undecided_prompts_once_then_shows() {
        let host = FakeHost::new(NotificationPermission::Default, NotificationPermission::Granted);
        let dispatcher = NotificationDispatcher::new(host.clone());

        let outcome = dispatcher.notify("Title", "Body").await;

        assert!(outcome.is_shown());
        assert_eq!(*host.requests.lock().unwrap(), 1);
        assert_eq!(
            host.shown.lock().unwrap()[0],
            NotificationEvent::new("Title", "Body")
        );
    }

    #[tokio::test]
    async fn undecided_then_denied_shows_nothing() {
        let host = FakeHost::new(NotificationPermission::Default, NotificationPermission::Denied);
        let dispatcher = NotificationDispatcher::new(host.clone());

        assert_eq!(dispatcher.notify("Title", "Body").await, NotifyOutcome::Denied);
        // Denied now sticks: no second prompt.
        assert_eq!(dispatcher.notify("Title", "Body").await, NotifyOutcome::Denied);
        assert_eq!(*host.requests.lock().unwrap(), 1);
        assert!(host.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dismissed_prompt_is_undecided() {
        let host = FakeHost::new(NotificationPermission::Default, NotificationPermission::Default);
        let dispatcher = NotificationDispatcher::new(host.clone());

        assert_eq!(dispatcher.notify("Title", "Body").await, NotifyOutcome::Undecided);
        assert!(host.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unsupported_host_is_silent() {
        let host = FakeHost::new(
            NotificationPermission::Unsupported,
            NotificationPermission::Unsupported,
        );
        let dispatcher = NotificationDispatcher::new(host.clone());

        assert_eq!(dispatcher.notify("Title", "Body").await, NotifyOutcome::Unsupported);
        assert_eq!(*host.requests.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn click_focuses_and_closes() {
        let host = FakeHost::new(NotificationPermission::Granted, NotificationPermission::Granted);
        let dispatcher = NotificationDispatcher::new(host.clone());

        let NotifyOutcome::Shown(id) = dispatcher.notify("Title", "Body").await else {
            panic!("expected notification to be shown");
        };
        dispatcher.handle_click(id);

        assert_eq!(*host.focused.lock().unwrap(), 1);
        assert_eq!(host.closed.lock().unwrap().as_slice(), &[id]);
    }
}
