mod notification;

pub use notification::{INotificationDispatcher, WebhookNotificationDispatcher};
