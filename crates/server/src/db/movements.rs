//! Database operations for the stock-movement ledger.
//!
//! Row writes here never touch `product.stock`; keeping the counter in sync
//! is the job of [`crate::services::ledger`], which calls these functions
//! together with [`super::products::adjust_stock`] inside one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgExecutor;

use stockroom_core::{MovementId, MovementKind, ProductId, StaffId};

use super::RepositoryError;
use crate::models::{Movement, MovementInput, MovementWithContext};

/// Internal row type for movement queries.
#[derive(Debug, sqlx::FromRow)]
struct MovementRow {
    id: i64,
    kind: String,
    quantity: i64,
    product_id: i64,
    recorded_by: i64,
    arrival_date: Option<NaiveDate>,
    delivery_date: Option<NaiveDate>,
    delivery_company: Option<String>,
    pickup_by: Option<String>,
    pickup_date: Option<NaiveDate>,
    order_number: Option<String>,
    sku: Option<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MovementRow> for Movement {
    type Error = RepositoryError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let kind: MovementKind = row.kind.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid movement kind in database: {e}"))
        })?;

        Ok(Self {
            id: MovementId::new(row.id),
            kind,
            quantity: row.quantity,
            product_id: ProductId::new(row.product_id),
            recorded_by: StaffId::new(row.recorded_by),
            arrival_date: row.arrival_date,
            delivery_date: row.delivery_date,
            delivery_company: row.delivery_company,
            pickup_by: row.pickup_by,
            pickup_date: row.pickup_date,
            order_number: row.order_number,
            sku: row.sku,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for movements joined with display names.
#[derive(Debug, sqlx::FromRow)]
struct MovementWithContextRow {
    #[sqlx(flatten)]
    movement: MovementRow,
    product_name: String,
    recorded_by_name: String,
}

impl TryFrom<MovementWithContextRow> for MovementWithContext {
    type Error = RepositoryError;

    fn try_from(row: MovementWithContextRow) -> Result<Self, Self::Error> {
        Ok(Self {
            movement: row.movement.try_into()?,
            product_name: row.product_name,
            recorded_by_name: row.recorded_by_name,
        })
    }
}

const MOVEMENT_COLUMNS: &str = "id, kind, quantity, product_id, recorded_by, arrival_date, \
     delivery_date, delivery_company, pickup_by, pickup_date, order_number, sku, notes, created_at";

const MOVEMENT_JOINED_COLUMNS: &str = "m.id, m.kind, m.quantity, m.product_id, m.recorded_by, \
     m.arrival_date, m.delivery_date, m.delivery_company, m.pickup_by, m.pickup_date, \
     m.order_number, m.sku, m.notes, m.created_at, \
     p.name AS product_name, s.name AS recorded_by_name";

/// Insert a movement row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert_movement(
    executor: impl PgExecutor<'_>,
    input: &MovementInput,
    recorded_by: StaffId,
) -> Result<Movement, RepositoryError> {
    let row = sqlx::query_as::<_, MovementRow>(&format!(
        r"
        INSERT INTO stockroom.movement (
            kind, quantity, product_id, recorded_by, arrival_date,
            delivery_date, delivery_company, pickup_by, pickup_date,
            order_number, sku, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {MOVEMENT_COLUMNS}
        "
    ))
    .bind(input.kind.as_str())
    .bind(input.quantity)
    .bind(input.product_id.as_i64())
    .bind(recorded_by.as_i64())
    .bind(input.arrival_date)
    .bind(input.delivery_date)
    .bind(input.delivery_company.as_deref())
    .bind(input.pickup_by.as_deref())
    .bind(input.pickup_date)
    .bind(input.order_number.as_deref())
    .bind(input.sku.as_deref())
    .bind(input.notes.as_deref())
    .fetch_one(executor)
    .await?;

    row.try_into()
}

/// Get a movement by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_movement(
    executor: impl PgExecutor<'_>,
    id: MovementId,
) -> Result<Option<Movement>, RepositoryError> {
    let row = sqlx::query_as::<_, MovementRow>(&format!(
        "SELECT {MOVEMENT_COLUMNS} FROM stockroom.movement WHERE id = $1"
    ))
    .bind(id.as_i64())
    .fetch_optional(executor)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// Get a movement by ID, enriched with product and recorder names.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_movement_with_context(
    executor: impl PgExecutor<'_>,
    id: MovementId,
) -> Result<Option<MovementWithContext>, RepositoryError> {
    let row = sqlx::query_as::<_, MovementWithContextRow>(&format!(
        r"
        SELECT {MOVEMENT_JOINED_COLUMNS}
        FROM stockroom.movement m
        INNER JOIN stockroom.product p ON p.id = m.product_id
        INNER JOIN stockroom.staff s ON s.id = m.recorded_by
        WHERE m.id = $1
        "
    ))
    .bind(id.as_i64())
    .fetch_optional(executor)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// List movements, newest first, enriched with display names.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_movements(
    executor: impl PgExecutor<'_>,
    product_id: Option<ProductId>,
    limit: i64,
    offset: i64,
) -> Result<Vec<MovementWithContext>, RepositoryError> {
    let rows = sqlx::query_as::<_, MovementWithContextRow>(&format!(
        r"
        SELECT {MOVEMENT_JOINED_COLUMNS}
        FROM stockroom.movement m
        INNER JOIN stockroom.product p ON p.id = m.product_id
        INNER JOIN stockroom.staff s ON s.id = m.recorded_by
        WHERE $1::bigint IS NULL OR m.product_id = $1
        ORDER BY m.created_at DESC, m.id DESC
        LIMIT $2 OFFSET $3
        "
    ))
    .bind(product_id.map(|id| id.as_i64()))
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
}

/// Overwrite a movement's stored fields.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn update_movement_row(
    executor: impl PgExecutor<'_>,
    id: MovementId,
    input: &MovementInput,
) -> Result<Option<Movement>, RepositoryError> {
    let row = sqlx::query_as::<_, MovementRow>(&format!(
        r"
        UPDATE stockroom.movement
        SET kind = $2, quantity = $3, product_id = $4, arrival_date = $5,
            delivery_date = $6, delivery_company = $7, pickup_by = $8,
            pickup_date = $9, order_number = $10, sku = $11, notes = $12
        WHERE id = $1
        RETURNING {MOVEMENT_COLUMNS}
        "
    ))
    .bind(id.as_i64())
    .bind(input.kind.as_str())
    .bind(input.quantity)
    .bind(input.product_id.as_i64())
    .bind(input.arrival_date)
    .bind(input.delivery_date)
    .bind(input.delivery_company.as_deref())
    .bind(input.pickup_by.as_deref())
    .bind(input.pickup_date)
    .bind(input.order_number.as_deref())
    .bind(input.sku.as_deref())
    .bind(input.notes.as_deref())
    .fetch_optional(executor)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// Delete a movement row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the delete fails.
pub async fn delete_movement_row(
    executor: impl PgExecutor<'_>,
    id: MovementId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM stockroom.movement WHERE id = $1")
        .bind(id.as_i64())
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
