use leadflow_core::remote::{Notification, NotificationSink, NotificationVariant};
use tracing::{info, warn};

/// Writes toasts to the log. Used when there is no UI to show them.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Success => info!(
                event_name = "notification.success",
                title = %notification.title,
                "{}",
                notification.message
            ),
            NotificationVariant::Error => warn!(
                event_name = "notification.error",
                title = %notification.title,
                "{}",
                notification.message
            ),
        }
    }
}
