//! User-facing notices (toasts).

use tokio::sync::broadcast;
use tracing::{info, warn};

const CHANNEL_CAPACITY: usize = 64;

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message for the user, published when an action completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Broadcast channel of notices. Publishing with no subscribers is fine.
#[derive(Debug, Clone)]
pub struct Notices {
    tx: broadcast::Sender<Notice>,
}

impl Notices {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Receive notices published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn publish(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => info!(message = %notice.message, "Notice"),
            NoticeLevel::Error => warn!(message = %notice.message, "Notice"),
        }
        // No subscribers is not an error.
        let _ = self.tx.send(notice);
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_notices() {
        let notices = Notices::new();
        let mut rx = notices.subscribe();
        notices.publish(Notice::success("Location created successfully"));
        assert_eq!(
            rx.recv().await.unwrap(),
            Notice::success("Location created successfully")
        );
    }

    #[test]
    fn test_publish_without_subscribers() {
        Notices::new().publish(Notice::error("Failed to delete user"));
    }
}
