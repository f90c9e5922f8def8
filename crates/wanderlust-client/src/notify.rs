//! User-facing notifications (toast messages).

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Destination for notifications raised by the browsing pipeline.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let message = notification.message.as_str();
        match notification.level {
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(message, "notification");
            }
            NotificationLevel::Warning => tracing::warn!(message, "notification"),
            NotificationLevel::Error => tracing::error!(message, "notification"),
        }
    }
}

/// Forwards notifications to a presentation task. A closed receiver drops
/// them.
impl Notifier for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            tracing::debug!("notification receiver closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_notifier_forwards_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.notify(Notification::success("Added to favorites!"));
        tx.notify(Notification::error("Error loading more listings"));

        assert_eq!(
            rx.try_recv().ok(),
            Some(Notification::success("Added to favorites!"))
        );
        let second = rx.try_recv().expect("second notification");
        assert_eq!(second.level, NotificationLevel::Error);
        assert_eq!(second.message, "Error loading more listings");
    }

    #[test]
    fn channel_notifier_tolerates_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        tx.notify(Notification::info("ignored"));
    }
}
