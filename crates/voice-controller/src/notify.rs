use crate::{Notification, NotificationSink, Severity};

/// Sink that writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Destructive => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            Severity::Info => tracing::info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}
