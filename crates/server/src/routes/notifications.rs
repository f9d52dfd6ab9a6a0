//! Notification route handlers.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use tracing::instrument;

use stockroom_core::NotificationId;

use crate::db::NotificationRepository;
use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::state::AppState;

use super::ok;

/// Build the notification router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/notifications", get(list))
        .route("/api/notifications/{id}/read", post(mark_read))
}

#[instrument(skip(state))]
async fn list(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let notifications = NotificationRepository::new(state.pool())
        .list_for(staff.id)
        .await?;
    Ok(ok(notifications))
}

#[instrument(skip(state))]
async fn mark_read(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    NotificationRepository::new(state.pool())
        .mark_read(NotificationId::new(id), staff.id)
        .await?;
    Ok(ok(serde_json::json!({ "read": true })))
}
