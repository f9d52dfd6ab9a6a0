//! Staff repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use stockroom_core::{Email, StaffId, StaffRole};

use super::RepositoryError;
use crate::models::StaffMember;

/// Internal row type for staff queries.
#[derive(Debug, sqlx::FromRow)]
struct StaffRow {
    id: i64,
    email: String,
    name: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StaffRow> for StaffMember {
    type Error = RepositoryError;

    fn try_from(row: StaffRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: StaffRole = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid staff role in database: {e}"))
        })?;

        Ok(Self {
            id: StaffId::new(row.id),
            email,
            name: row.name,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const STAFF_COLUMNS: &str = "id, email, name, role, created_at, updated_at";

/// Repository for staff database operations.
pub struct StaffRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StaffRepository<'a> {
    /// Create a new staff repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all staff members, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<StaffMember>, RepositoryError> {
        let rows = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {STAFF_COLUMNS} FROM stockroom.staff ORDER BY created_at ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get a staff member by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: StaffId) -> Result<Option<StaffMember>, RepositoryError> {
        let row = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {STAFF_COLUMNS} FROM stockroom.staff WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a staff member by email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<StaffMember>, RepositoryError> {
        let row = sqlx::query_as::<_, StaffRow>(&format!(
            "SELECT {STAFF_COLUMNS} FROM stockroom.staff WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new staff member.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        role: StaffRole,
    ) -> Result<StaffMember, RepositoryError> {
        let row = sqlx::query_as::<_, StaffRow>(&format!(
            r"
            INSERT INTO stockroom.staff (email, name, role)
            VALUES ($1, $2, $3)
            RETURNING {STAFF_COLUMNS}
            "
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(role.to_string())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(
                    "a staff member with this email already exists".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Delete a staff member.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no staff member has this ID.
    /// Returns `RepositoryError::Conflict` if ledger movements still
    /// reference the member.
    pub async fn delete(&self, id: StaffId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM stockroom.staff WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(
                        "staff member still has recorded movements".to_owned(),
                    );
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
