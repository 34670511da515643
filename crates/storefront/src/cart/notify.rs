//! Notification side-channel.
//!
//! The cart store reports user-facing outcomes ("Added Linen Throw to your
//! cart") through a [`Notifier`]. Delivery is fire-and-forget: a notifier
//! cannot fail the operation that produced the notification.

use std::sync::Mutex;

use serde::Serialize;

/// Presentation kind of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    Success,
    Info,
}

/// A message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotifyKind,
    pub message: String,
}

impl Notification {
    /// A success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotifyKind::Success,
            message: message.into(),
        }
    }

    /// An informational notification.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotifyKind::Info,
            message: message.into(),
        }
    }
}

/// Receiver of cart notifications.
pub trait Notifier: Send + Sync {
    /// Deliver a notification. Must not panic.
    fn notify(&self, notification: &Notification);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: &Notification) {}
}

/// Emits notifications as structured log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::info!(
            target: "driftwood::toast",
            kind = ?notification.kind,
            "{}",
            notification.message
        );
    }
}

/// Buffers notifications until the current request drains them as toasts.
#[derive(Debug, Default)]
pub struct ToastQueue {
    pending: Mutex<Vec<Notification>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every buffered notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        self.pending
            .lock()
            .map(|mut pending| std::mem::take(&mut *pending))
            .unwrap_or_default()
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: &Notification) {
        // A poisoned queue only loses toasts; the cart itself is unaffected.
        if let Ok(mut pending) = self.pending.lock() {
            pending.push(notification.clone());
        }
    }
}
