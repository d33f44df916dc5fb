// Notification channel - one visible message at a time with auto-dismissal
use crate::domain::notification::{Notification, Severity};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_millis(3000);

#[derive(Clone)]
pub struct NotificationChannel {
    inner: Arc<Inner>,
}

struct Inner {
    current: watch::Sender<Option<Notification>>,
    last_id: AtomicU64,
    dismiss_after: Duration,
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}

impl NotificationChannel {
    pub fn new(dismiss_after: Duration) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                current,
                last_id: AtomicU64::new(0),
                dismiss_after,
            }),
        }
    }

    /// Replaces the visible notification and schedules its removal.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> u64 {
        let id = self.inner.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let notification = Notification {
            id,
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };

        match severity {
            Severity::Error => tracing::warn!(id = id, "notification: {}", notification.message),
            _ => tracing::info!(id = id, "notification: {}", notification.message),
        }
        self.inner.current.send_replace(Some(notification));

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.dismiss_after).await;
            // Only dismiss if nothing superseded us in the meantime
            inner.current.send_if_modified(|current| match current {
                Some(visible) if visible.id == id => {
                    *current = None;
                    true
                }
                _ => false,
            });
        });

        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.notify(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(message, Severity::Error)
    }

    pub fn current(&self) -> Option<Notification> {
        self.inner.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.inner.current.subscribe()
    }
}

#[cfg(test)]
impl NotificationChannel {
    /// Id of the most recently issued notification, 0 if none was issued.
    pub fn last_id(&self) -> u64 {
        self.inner.last_id.load(Ordering::SeqCst)
    }
}
