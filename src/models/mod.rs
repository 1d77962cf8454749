pub mod notification;
pub mod position;

pub use notification::{NotificationEvent, NotificationId, NotificationPermission};
pub use position::{LocationOptions, Position};
