//! Notification domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::{NotificationId, NotificationKind, StaffId};

/// A notification for one staff member or, when `recipient` is `None`,
/// a broadcast to everyone.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Unique notification ID.
    pub id: NotificationId,
    /// Addressed staff member; `None` means broadcast.
    pub recipient: Option<StaffId>,
    /// What the notification is about.
    pub kind: NotificationKind,
    /// Human-readable message.
    pub message: String,
    /// When the notification was read, if it has been.
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Returns true if the notification has not been read yet.
    #[must_use]
    pub const fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}
