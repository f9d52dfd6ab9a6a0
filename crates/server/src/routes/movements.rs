//! Stock movement route handlers.
//!
//! The three write handlers are thin wrappers over
//! [`crate::services::ledger::StockLedger`], which owns the invariant
//! between `product.stock` and the movement table.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::{MovementId, ProductId};

use crate::db;
use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::models::MovementInput;
use crate::services::{Notifier, StockLedger};
use crate::state::AppState;

use super::{created, ok};

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

/// Query parameters for the movement list.
#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    /// Only movements for this product.
    pub product_id: Option<i64>,
    /// Page size (default 100, max 500).
    pub limit: Option<i64>,
    /// Page offset.
    pub offset: Option<i64>,
}

/// Build the movement router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/movements", get(list).post(create))
        .route(
            "/api/movements/{id}",
            axum::routing::put(update).delete(delete_movement),
        )
}

/// Broadcast a stock-depleted notification when an adjustment that took
/// stock out landed exactly on zero.
async fn maybe_notify_depleted(
    state: &AppState,
    product_id: ProductId,
    stock_after: i64,
    delta_applied: i64,
) {
    if stock_after != 0 || delta_applied >= 0 {
        return;
    }
    match db::products::get_product(state.pool(), product_id).await {
        Ok(Some(product)) => Notifier::new(state.pool()).stock_depleted(&product).await,
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(product_id = %product_id, error = %e, "failed to load product for depletion notice");
        }
    }
}

#[instrument(skip(state))]
async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<MovementsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);
    let movements = db::movements::list_movements(
        state.pool(),
        query.product_id.map(ProductId::new),
        limit,
        offset,
    )
    .await?;
    Ok(ok(movements))
}

#[instrument(skip(state, input))]
async fn create(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<MovementInput>,
) -> Result<impl IntoResponse, AppError> {
    let ledger = StockLedger::new(state.pool());
    let outcome = ledger.create_movement(&input, staff.id).await?;

    maybe_notify_depleted(
        &state,
        input.product_id,
        outcome.stock_after,
        outcome.delta_applied,
    )
    .await;

    Ok(created(outcome.movement))
}

#[instrument(skip(state, input))]
async fn update(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<MovementInput>,
) -> Result<impl IntoResponse, AppError> {
    let ledger = StockLedger::new(state.pool());
    let outcome = ledger.update_movement(MovementId::new(id), &input).await?;

    maybe_notify_depleted(
        &state,
        input.product_id,
        outcome.stock_after,
        outcome.delta_applied,
    )
    .await;

    Ok(ok(outcome.movement))
}

#[instrument(skip(state))]
async fn delete_movement(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let ledger = StockLedger::new(state.pool());
    let outcome = ledger.delete_movement(MovementId::new(id)).await?;

    maybe_notify_depleted(
        &state,
        outcome.movement.product_id,
        outcome.stock_after,
        outcome.delta_applied,
    )
    .await;

    Ok(ok(outcome.movement))
}
