//! Notification repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{NotificationId, NotificationKind, StaffId};

use super::RepositoryError;
use crate::models::Notification;

/// Internal row type for notification queries.
#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    recipient: Option<i64>,
    kind: String,
    message: String,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = RepositoryError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let kind: NotificationKind = row.kind.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid notification kind in database: {e}"))
        })?;

        Ok(Self {
            id: NotificationId::new(row.id),
            recipient: row.recipient.map(StaffId::new),
            kind,
            message: row.message,
            read_at: row.read_at,
            created_at: row.created_at,
        })
    }
}

const NOTIFICATION_COLUMNS: &str = "id, recipient, kind, message, read_at, created_at";

/// Repository for notification database operations.
pub struct NotificationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NotificationRepository<'a> {
    /// Create a new notification repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a notification. `recipient = None` broadcasts to everyone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        recipient: Option<StaffId>,
        kind: NotificationKind,
        message: &str,
    ) -> Result<Notification, RepositoryError> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            r"
            INSERT INTO stockroom.notification (recipient, kind, message)
            VALUES ($1, $2, $3)
            RETURNING {NOTIFICATION_COLUMNS}
            "
        ))
        .bind(recipient.map(|id| id.as_i64()))
        .bind(kind.as_str())
        .bind(message)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// List notifications visible to a staff member (their own plus
    /// broadcasts), unread first, newest first within each group.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for(&self, staff_id: StaffId) -> Result<Vec<Notification>, RepositoryError> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            r"
            SELECT {NOTIFICATION_COLUMNS}
            FROM stockroom.notification
            WHERE recipient IS NULL OR recipient = $1
            ORDER BY (read_at IS NULL) DESC, created_at DESC
            "
        ))
        .bind(staff_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Mark a notification as read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the notification does not
    /// exist or is not visible to this staff member.
    pub async fn mark_read(
        &self,
        id: NotificationId,
        staff_id: StaffId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE stockroom.notification
            SET read_at = NOW()
            WHERE id = $1 AND (recipient IS NULL OR recipient = $2) AND read_at IS NULL
            ",
        )
        .bind(id.as_i64())
        .bind(staff_id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
