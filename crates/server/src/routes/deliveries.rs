//! Delivery scheduling and workflow route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use stockroom_core::{DeliveryId, DeliveryStatus};

use crate::db::DeliveryRepository;
use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::models::ScheduleDeliveryInput;
use crate::services::Notifier;
use crate::state::AppState;

use super::{created, ok};

/// Query parameters for the delivery list.
#[derive(Debug, Deserialize)]
pub struct DeliveriesQuery {
    /// Only deliveries in this status.
    pub status: Option<DeliveryStatus>,
}

/// Payload for a workflow transition.
#[derive(Debug, Deserialize)]
pub struct TransitionInput {
    /// The status to move to.
    pub status: DeliveryStatus,
}

/// Build the delivery router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/deliveries", get(list).post(create))
        .route("/api/deliveries/{id}", get(show))
        .route("/api/deliveries/{id}/status", post(transition))
}

#[instrument(skip(state))]
async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<DeliveriesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let deliveries = DeliveryRepository::new(state.pool())
        .list(query.status)
        .await?;
    Ok(ok(deliveries))
}

#[instrument(skip(state, input))]
async fn create(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<ScheduleDeliveryInput>,
) -> Result<impl IntoResponse, AppError> {
    input.validate().map_err(AppError::Validation)?;

    let delivery = DeliveryRepository::new(state.pool()).create(&input).await?;
    Notifier::new(state.pool())
        .delivery_scheduled(&delivery)
        .await;

    Ok(created(delivery))
}

#[instrument(skip(state))]
async fn show(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let id = DeliveryId::new(id);
    let delivery = DeliveryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("delivery {id}")))?;
    Ok(ok(delivery))
}

#[instrument(skip(state))]
async fn transition(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TransitionInput>,
) -> Result<impl IntoResponse, AppError> {
    let id = DeliveryId::new(id);
    let repo = DeliveryRepository::new(state.pool());

    let delivery = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("delivery {id}")))?;

    if !delivery.status.can_transition_to(input.status) {
        return Err(AppError::Conflict(format!(
            "cannot move delivery from {} to {}",
            delivery.status, input.status
        )));
    }

    // The status guard in set_status makes the transition atomic; a
    // concurrent transition loses the race and surfaces as a conflict.
    let updated = repo
        .set_status(id, delivery.status, input.status)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("delivery status changed concurrently, retry".to_owned())
        })?;

    Notifier::new(state.pool())
        .delivery_status_changed(&updated)
        .await;

    Ok(ok(updated))
}
