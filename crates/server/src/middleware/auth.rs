//! Authentication extractors for route handlers.
//!
//! All rejections are JSON envelopes, matching the `/api` response shape.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use stockroom_core::StaffRole;

use crate::models::{CurrentStaff, session_keys};

fn envelope(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "success": false, "error": message })),
    )
        .into_response()
}

/// Extractor that requires a signed-in staff member.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireStaff(staff): RequireStaff,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", staff.name)
/// }
/// ```
pub struct RequireStaff(pub CurrentStaff);

/// Rejection when no staff member is signed in.
pub struct StaffAuthRejection;

impl IntoResponse for StaffAuthRejection {
    fn into_response(self) -> Response {
        envelope(StatusCode::UNAUTHORIZED, "authentication required")
    }
}

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = StaffAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(StaffAuthRejection)?;

        let staff: CurrentStaff = session
            .get(session_keys::CURRENT_STAFF)
            .await
            .ok()
            .flatten()
            .ok_or(StaffAuthRejection)?;

        Ok(Self(staff))
    }
}

/// Extractor that requires a signed-in manager.
///
/// Returns 401 when nobody is signed in and 403 when the signed-in staff
/// member is not a manager.
pub struct RequireManager(pub CurrentStaff);

/// Rejection for manager-only routes.
pub enum ManagerRejection {
    /// Nobody is signed in.
    Unauthorized,
    /// Signed in, but not a manager.
    Forbidden,
}

impl IntoResponse for ManagerRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => envelope(StatusCode::UNAUTHORIZED, "authentication required"),
            Self::Forbidden => envelope(
                StatusCode::FORBIDDEN,
                "only managers can access this resource",
            ),
        }
    }
}

impl<S> FromRequestParts<S> for RequireManager
where
    S: Send + Sync,
{
    type Rejection = ManagerRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(ManagerRejection::Unauthorized)?;

        let staff: CurrentStaff = session
            .get(session_keys::CURRENT_STAFF)
            .await
            .ok()
            .flatten()
            .ok_or(ManagerRejection::Unauthorized)?;

        if staff.role != StaffRole::Manager {
            return Err(ManagerRejection::Forbidden);
        }

        Ok(Self(staff))
    }
}

/// Helper to set the current staff member in the session (sign in).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_staff(
    session: &Session,
    staff: &CurrentStaff,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_STAFF, staff).await
}

/// Helper to clear the current staff member from the session (sign out).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_staff(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentStaff>(session_keys::CURRENT_STAFF)
        .await?;
    Ok(())
}
