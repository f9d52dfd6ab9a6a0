//! Staff invite repository for database operations.
//!
//! Manages the invite allowlist for staff registration.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{Email, StaffId, StaffInviteId, StaffRole};

use super::RepositoryError;

/// A staff invite record.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StaffInvite {
    /// Unique identifier.
    pub id: StaffInviteId,
    /// Email address that can register.
    pub email: Email,
    /// Display name for the new staff member.
    pub name: String,
    /// Role to assign when the invite is used.
    pub role: StaffRole,
    /// Staff member who created this invite (None for CLI-created).
    pub invited_by: Option<StaffId>,
    /// When the invite was created.
    pub created_at: DateTime<Utc>,
    /// When the invite expires.
    pub expires_at: DateTime<Utc>,
    /// When the invite was used (None if unused).
    pub used_at: Option<DateTime<Utc>>,
    /// Staff member created when the invite was used.
    pub used_by: Option<StaffId>,
}

impl StaffInvite {
    /// Returns true if this invite has already been used.
    #[must_use]
    pub const fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Returns true if this invite has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Returns true if this invite can still be used.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_used() && !self.is_expired()
    }
}

/// Internal row type for database queries.
#[derive(Debug, sqlx::FromRow)]
struct StaffInviteRow {
    id: i64,
    email: String,
    name: String,
    role: String,
    invited_by: Option<i64>,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
    used_by: Option<i64>,
}

impl TryFrom<StaffInviteRow> for StaffInvite {
    type Error = RepositoryError;

    fn try_from(row: StaffInviteRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: StaffRole = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid staff role in database: {e}"))
        })?;

        Ok(Self {
            id: StaffInviteId::new(row.id),
            email,
            name: row.name,
            role,
            invited_by: row.invited_by.map(StaffId::new),
            created_at: row.created_at,
            expires_at: row.expires_at,
            used_at: row.used_at,
            used_by: row.used_by.map(StaffId::new),
        })
    }
}

const INVITE_COLUMNS: &str =
    "id, email, name, role, invited_by, created_at, expires_at, used_at, used_by";

/// Repository for staff invite database operations.
pub struct StaffInviteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StaffInviteRepository<'a> {
    /// Create a new invite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all invites (pending and used), newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<StaffInvite>, RepositoryError> {
        let rows = sqlx::query_as::<_, StaffInviteRow>(&format!(
            "SELECT {INVITE_COLUMNS} FROM stockroom.staff_invite ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an invite by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<StaffInvite>, RepositoryError> {
        let row = sqlx::query_as::<_, StaffInviteRow>(&format!(
            "SELECT {INVITE_COLUMNS} FROM stockroom.staff_invite WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new invite.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an invite already exists for this email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: StaffRole,
        invited_by: Option<StaffId>,
        expires_in_days: i32,
    ) -> Result<StaffInvite, RepositoryError> {
        let row = sqlx::query_as::<_, StaffInviteRow>(&format!(
            r"
            INSERT INTO stockroom.staff_invite (email, name, role, invited_by, expires_at)
            VALUES ($1, $2, $3, $4, NOW() + make_interval(days => $5))
            RETURNING {INVITE_COLUMNS}
            "
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(role.to_string())
        .bind(invited_by.map(|id| id.as_i64()))
        .bind(expires_in_days)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "an invite already exists for this email".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Mark an invite as used by a new staff member.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no unused invite exists for
    /// this email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn mark_used(&self, email: &str, used_by: StaffId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE stockroom.staff_invite
            SET used_at = NOW(), used_by = $1
            WHERE email = $2 AND used_at IS NULL
            ",
        )
        .bind(used_by.as_i64())
        .bind(email)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete expired invites (cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_expired(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM stockroom.staff_invite
            WHERE used_at IS NULL AND expires_at < NOW()
            ",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
