//! Delivery repository for database operations.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use stockroom_core::{DeliveryId, DeliveryStatus, MovementId, ProductId, StaffId};

use super::RepositoryError;
use crate::models::{Delivery, ScheduleDeliveryInput};

/// Internal row type for delivery queries.
#[derive(Debug, sqlx::FromRow)]
struct DeliveryRow {
    id: i64,
    order_number: String,
    delivery_company: String,
    product_id: Option<i64>,
    movement_id: Option<i64>,
    scheduled_date: NaiveDate,
    status: String,
    assigned_to: Option<i64>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DeliveryRow> for Delivery {
    type Error = RepositoryError;

    fn try_from(row: DeliveryRow) -> Result<Self, Self::Error> {
        let status: DeliveryStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid delivery status in database: {e}"))
        })?;

        Ok(Self {
            id: DeliveryId::new(row.id),
            order_number: row.order_number,
            delivery_company: row.delivery_company,
            product_id: row.product_id.map(ProductId::new),
            movement_id: row.movement_id.map(MovementId::new),
            scheduled_date: row.scheduled_date,
            status,
            assigned_to: row.assigned_to.map(StaffId::new),
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const DELIVERY_COLUMNS: &str = "id, order_number, delivery_company, product_id, movement_id, \
     scheduled_date, status, assigned_to, notes, created_at, updated_at";

/// Repository for delivery database operations.
pub struct DeliveryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DeliveryRepository<'a> {
    /// Create a new delivery repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Schedule a new delivery. Starts in `scheduled`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ScheduleDeliveryInput) -> Result<Delivery, RepositoryError> {
        let row = sqlx::query_as::<_, DeliveryRow>(&format!(
            r"
            INSERT INTO stockroom.delivery (
                order_number, delivery_company, product_id, movement_id,
                scheduled_date, assigned_to, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {DELIVERY_COLUMNS}
            "
        ))
        .bind(&input.order_number)
        .bind(&input.delivery_company)
        .bind(input.product_id.map(|id| id.as_i64()))
        .bind(input.movement_id.map(|id| id.as_i64()))
        .bind(input.scheduled_date)
        .bind(input.assigned_to.map(|id| id.as_i64()))
        .bind(input.notes.as_deref())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Get a delivery by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: DeliveryId) -> Result<Option<Delivery>, RepositoryError> {
        let row = sqlx::query_as::<_, DeliveryRow>(&format!(
            "SELECT {DELIVERY_COLUMNS} FROM stockroom.delivery WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// List deliveries, optionally filtered by status, soonest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<DeliveryStatus>,
    ) -> Result<Vec<Delivery>, RepositoryError> {
        let rows = sqlx::query_as::<_, DeliveryRow>(&format!(
            r"
            SELECT {DELIVERY_COLUMNS}
            FROM stockroom.delivery
            WHERE $1::text IS NULL OR status = $1
            ORDER BY scheduled_date ASC, created_at ASC
            "
        ))
        .bind(status.map(DeliveryStatus::as_str))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Move a delivery to a new status.
    ///
    /// The guard on the current status makes the transition atomic: a
    /// concurrent transition of the same delivery loses the race and
    /// affects zero rows.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn set_status(
        &self,
        id: DeliveryId,
        from: DeliveryStatus,
        to: DeliveryStatus,
    ) -> Result<Option<Delivery>, RepositoryError> {
        let row = sqlx::query_as::<_, DeliveryRow>(&format!(
            r"
            UPDATE stockroom.delivery
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING {DELIVERY_COLUMNS}
            "
        ))
        .bind(id.as_i64())
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}
