//! Transient user-facing notifications.
//!
//! Every mutation outcome (success or failure) produces a notification
//! that auto-dismisses after a fixed lifetime or is dismissed early by
//! the user. The [`NotificationCenter`] owns the active set; the UI
//! renders [`active`](NotificationCenter::active) and emits
//! [`dismiss`](NotificationCenter::dismiss) intents.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::config::DEFAULT_NOTIFICATION_TTL;

/// Visual category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Confirms a completed action.
    Success,
    /// Reports a failed action.
    Error,
}

/// A single transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Unique id, used to dismiss this entry.
    pub id: u64,
    /// Visual category.
    pub kind: NotificationKind,
    /// User-facing text.
    pub message: String,
}

/// Holds the active notifications and schedules their auto-dismissal.
///
/// Cloning shares the underlying set. Auto-dismissal needs a tokio
/// runtime; pushed from outside one, entries simply stay until dismissed
/// explicitly (synchronous unit tests hit this path).
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    entries: Arc<RwLock<Vec<Notification>>>,
    next_id: Arc<AtomicU64>,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl NotificationCenter {
    /// Creates a center whose entries auto-dismiss after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            ttl,
        }
    }

    /// Pushes a success notification.
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Success, message.into())
    }

    /// Pushes an error notification.
    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(NotificationKind::Error, message.into())
    }

    fn push(&self, kind: NotificationKind, message: String) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.write().push(Notification { id, kind, message });

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let entries = Arc::clone(&self.entries);
            let ttl = self.ttl;
            handle.spawn(async move {
                tokio::time::sleep(ttl).await;
                entries.write().retain(|n| n.id != id);
            });
        }

        id
    }

    /// Dismisses a notification early. Unknown ids are ignored.
    pub fn dismiss(&self, id: u64) {
        self.entries.write().retain(|n| n.id != id);
    }

    /// Snapshot of the currently visible notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.entries.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_dismiss() {
        let center = NotificationCenter::default();
        let id = center.success("Task created successfully");
        assert_eq!(center.active().len(), 1);
        assert_eq!(center.active()[0].kind, NotificationKind::Success);

        center.dismiss(id);
        assert!(center.active().is_empty());
    }

    #[test]
    fn dismiss_unknown_id_is_noop() {
        let center = NotificationCenter::default();
        center.error("boom");
        center.dismiss(9999);
        assert_eq!(center.active().len(), 1);
    }

    #[test]
    fn ids_are_unique_and_order_preserved() {
        let center = NotificationCenter::default();
        let a = center.success("first");
        let b = center.error("second");
        assert_ne!(a, b);
        let active = center.active();
        assert_eq!(active[0].message, "first");
        assert_eq!(active[1].message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn entries_auto_dismiss_after_ttl() {
        let center = NotificationCenter::new(Duration::from_millis(5_000));
        center.success("transient");
        assert_eq!(center.active().len(), 1);

        tokio::time::sleep(Duration::from_millis(5_001)).await;
        // Let the dismissal task run.
        tokio::task::yield_now().await;
        assert!(center.active().is_empty());
    }
}
