//! Database operations for the product catalog.
//!
//! Functions take any `PgExecutor` so the stock ledger can run them inside
//! its transactions; route handlers pass the pool directly.

use chrono::{DateTime, Utc};
use sqlx::PgExecutor;

use stockroom_core::{ProductId, Sku};

use super::RepositoryError;
use crate::models::Product;

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    sku: String,
    category: Option<String>,
    brand: Option<String>,
    stock: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let sku = Sku::parse(&row.sku).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid SKU in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            sku,
            category: row.category,
            brand: row.brand,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, name, sku, category, brand, stock, created_at, updated_at";

/// Create a new product.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the SKU is already taken.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn create_product(
    executor: impl PgExecutor<'_>,
    name: &str,
    sku: &Sku,
    category: Option<&str>,
    brand: Option<&str>,
    opening_stock: i64,
) -> Result<Product, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r"
        INSERT INTO stockroom.product (name, sku, category, brand, stock)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, sku, category, brand, stock, created_at, updated_at
        ",
    )
    .bind(name)
    .bind(sku.as_str())
    .bind(category)
    .bind(brand)
    .bind(opening_stock)
    .fetch_one(executor)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("a product with this SKU already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    row.try_into()
}

/// Get a product by ID.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_product(
    executor: impl PgExecutor<'_>,
    id: ProductId,
) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM stockroom.product WHERE id = $1"
    ))
    .bind(id.as_i64())
    .fetch_optional(executor)
    .await?;

    row.map(TryInto::try_into).transpose()
}

/// List products, optionally filtered by a name/SKU search term.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn list_products(
    executor: impl PgExecutor<'_>,
    search: Option<&str>,
) -> Result<Vec<Product>, RepositoryError> {
    let pattern = search.map(|s| format!("%{s}%"));

    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        r"
        SELECT {PRODUCT_COLUMNS}
        FROM stockroom.product
        WHERE $1::text IS NULL OR name ILIKE $1 OR sku ILIKE $1
        ORDER BY name ASC
        "
    ))
    .bind(pattern)
    .fetch_all(executor)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
}

/// Apply an administrative edit. Absent fields are left unchanged.
/// Never touches the stock counter.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if a new SKU is already taken.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn update_product(
    executor: impl PgExecutor<'_>,
    id: ProductId,
    name: Option<&str>,
    sku: Option<&Sku>,
    category: Option<&str>,
    brand: Option<&str>,
) -> Result<Option<Product>, RepositoryError> {
    let row = sqlx::query_as::<_, ProductRow>(
        r"
        UPDATE stockroom.product
        SET name = COALESCE($2, name),
            sku = COALESCE($3, sku),
            category = COALESCE($4, category),
            brand = COALESCE($5, brand),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, sku, category, brand, stock, created_at, updated_at
        ",
    )
    .bind(id.as_i64())
    .bind(name)
    .bind(sku.map(Sku::as_str))
    .bind(category)
    .bind(brand)
    .fetch_optional(executor)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return RepositoryError::Conflict("a product with this SKU already exists".to_owned());
        }
        RepositoryError::Database(e)
    })?;

    row.map(TryInto::try_into).transpose()
}

/// Delete a product. Fails while ledger movements still reference it.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if movements reference the product.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn delete_product(
    executor: impl PgExecutor<'_>,
    id: ProductId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM stockroom.product WHERE id = $1")
        .bind(id.as_i64())
        .execute(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::Conflict(
                    "product still has stock movements or deliveries referencing it".to_owned(),
                );
            }
            RepositoryError::Database(e)
        })?;

    Ok(result.rows_affected() > 0)
}

/// Atomically apply a signed delta to a product's stock counter.
///
/// The guard `stock + $2 >= 0` is evaluated server-side together with the
/// increment, so concurrent adjustments serialize on the row and a delta
/// that would drive stock negative never writes.
///
/// Returns the new stock value, or `None` when no row was updated (product
/// absent, or the guard rejected the delta - use [`get_stock`] to tell the
/// two apart).
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn adjust_stock(
    executor: impl PgExecutor<'_>,
    id: ProductId,
    delta: i64,
) -> Result<Option<i64>, RepositoryError> {
    let new_stock = sqlx::query_scalar::<_, i64>(
        r"
        UPDATE stockroom.product
        SET stock = stock + $2, updated_at = NOW()
        WHERE id = $1 AND stock + $2 >= 0
        RETURNING stock
        ",
    )
    .bind(id.as_i64())
    .bind(delta)
    .fetch_optional(executor)
    .await?;

    Ok(new_stock)
}

/// Read a product's current stock counter.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_stock(
    executor: impl PgExecutor<'_>,
    id: ProductId,
) -> Result<Option<i64>, RepositoryError> {
    let stock = sqlx::query_scalar::<_, i64>("SELECT stock FROM stockroom.product WHERE id = $1")
        .bind(id.as_i64())
        .fetch_optional(executor)
        .await?;

    Ok(stock)
}
