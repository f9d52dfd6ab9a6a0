//! Product catalog route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::ProductId;

use crate::db;
use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::models::{CreateProductInput, UpdateProductInput};
use crate::state::AppState;

use super::{created, ok};

/// Query parameters for the product list.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Case-insensitive substring match on name or SKU.
    pub search: Option<String>,
}

/// Build the product router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create))
        .route(
            "/api/products/{id}",
            get(show).put(update).delete(delete_product),
        )
}

#[instrument(skip(state))]
async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let products = db::products::list_products(state.pool(), query.search.as_deref()).await?;
    Ok(ok(products))
}

#[instrument(skip(state, input))]
async fn create(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> Result<impl IntoResponse, AppError> {
    let (sku, opening_stock) = input.validate().map_err(AppError::Validation)?;
    let product = db::products::create_product(
        state.pool(),
        input.name.trim(),
        &sku,
        input.category.as_deref(),
        input.brand.as_deref(),
        opening_stock,
    )
    .await?;
    Ok(created(product))
}

#[instrument(skip(state))]
async fn show(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let id = ProductId::new(id);
    let product = db::products::get_product(state.pool(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(ok(product))
}

#[instrument(skip(state, input))]
async fn update(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateProductInput>,
) -> Result<impl IntoResponse, AppError> {
    let id = ProductId::new(id);
    let sku = input.validate().map_err(AppError::Validation)?;
    let product = db::products::update_product(
        state.pool(),
        id,
        input.name.as_deref().map(str::trim),
        sku.as_ref(),
        input.category.as_deref(),
        input.brand.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(ok(product))
}

#[instrument(skip(state))]
async fn delete_product(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let id = ProductId::new(id);
    if !db::products::delete_product(state.pool(), id).await? {
        return Err(AppError::NotFound(format!("product {id}")));
    }
    Ok(ok(serde_json::json!({ "deleted": true })))
}
