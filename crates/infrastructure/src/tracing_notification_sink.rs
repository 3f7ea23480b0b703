//! Notification sink that writes console alerts to tracing output.

use tracing::{error, info};
use warden_application::{Notification, NotificationLevel, NotificationSink};

/// Notification sink that logs every alert.
#[derive(Clone, Default)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    /// Creates a new tracing notification sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(
                message = %notification.message,
                description = %notification.description,
                "console notification"
            ),
            NotificationLevel::Error => error!(
                message = %notification.message,
                description = %notification.description,
                "console notification"
            ),
        }
    }
}
