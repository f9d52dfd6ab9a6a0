//! Session route handlers.
//!
//! Sign-in happens through invite acceptance
//! ([`super::staff::routes`]) or an external identity provider outside this
//! crate; these handlers only expose the current session and end it.

use axum::{Router, response::IntoResponse, routing::{get, post}};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::middleware::auth::clear_current_staff;
use crate::state::AppState;

use super::ok;

/// Build the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
}

#[instrument(skip_all)]
async fn me(RequireStaff(staff): RequireStaff) -> Result<impl IntoResponse, AppError> {
    Ok(ok(staff))
}

#[instrument(skip_all)]
async fn logout(
    RequireStaff(_staff): RequireStaff,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    clear_current_staff(&session).await?;
    crate::error::clear_sentry_user();
    Ok(ok(serde_json::json!({ "logged_out": true })))
}
