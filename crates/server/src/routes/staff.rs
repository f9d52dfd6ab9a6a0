//! Staff management and invite route handlers.
//!
//! Invite creation and staff removal are manager-only. Accepting an invite
//! requires no session: the new staff member registers with the invited
//! email address and is signed in on success.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use stockroom_core::{Email, StaffId, StaffRole};

use crate::db::{StaffInviteRepository, StaffRepository};
use crate::error::AppError;
use crate::middleware::auth::set_current_staff;
use crate::middleware::{RequireManager, RequireStaff};
use crate::models::CurrentStaff;
use crate::services::Notifier;
use crate::state::AppState;

use super::{created, ok};

/// Default invite validity window in days.
const DEFAULT_INVITE_EXPIRY_DAYS: i32 = 7;

/// Payload for creating an invite.
#[derive(Debug, Deserialize)]
pub struct CreateInviteInput {
    /// Email address allowed to register.
    pub email: String,
    /// Display name for the new staff member.
    pub name: String,
    /// Role to assign when the invite is used.
    pub role: StaffRole,
    /// Validity window in days (default 7).
    #[serde(default)]
    pub expires_in_days: Option<i32>,
}

/// Payload for accepting an invite.
#[derive(Debug, Deserialize)]
pub struct AcceptInviteInput {
    /// The invited email address.
    pub email: String,
}

/// Build the staff router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/staff", get(list))
        .route("/api/staff/{id}", axum::routing::delete(remove))
        .route("/api/staff/invites", get(list_invites).post(create_invite))
        .route("/api/staff/invites/accept", post(accept_invite))
}

#[instrument(skip(state))]
async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let members = StaffRepository::new(state.pool()).list_all().await?;
    Ok(ok(members))
}

#[instrument(skip(state))]
async fn remove(
    RequireManager(manager): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let id = StaffId::new(id);
    if id == manager.id {
        return Err(AppError::Conflict(
            "cannot remove your own account".to_owned(),
        ));
    }

    StaffRepository::new(state.pool()).delete(id).await?;
    Ok(ok(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state))]
async fn list_invites(
    RequireManager(_manager): RequireManager,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let invites = StaffInviteRepository::new(state.pool()).list_all().await?;
    Ok(ok(invites))
}

#[instrument(skip(state, input))]
async fn create_invite(
    RequireManager(manager): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateInviteInput>,
) -> Result<impl IntoResponse, AppError> {
    let email = Email::parse(&input.email).map_err(|e| AppError::Validation(e.to_string()))?;
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_owned()));
    }
    let expires_in_days = input.expires_in_days.unwrap_or(DEFAULT_INVITE_EXPIRY_DAYS);
    if expires_in_days <= 0 {
        return Err(AppError::Validation(
            "expires_in_days must be positive".to_owned(),
        ));
    }

    let staff_repo = StaffRepository::new(state.pool());
    if staff_repo.get_by_email(email.as_str()).await?.is_some() {
        return Err(AppError::Conflict(
            "a staff member with this email already exists".to_owned(),
        ));
    }

    let invite = StaffInviteRepository::new(state.pool())
        .create(
            &email,
            input.name.trim(),
            input.role,
            Some(manager.id),
            expires_in_days,
        )
        .await?;

    state
        .email()
        .send_invite(
            invite.email.as_str(),
            &invite.name,
            &invite.role.to_string(),
            expires_in_days,
        )
        .await?;

    Ok(created(invite))
}

#[instrument(skip(state, session, input))]
async fn accept_invite(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<AcceptInviteInput>,
) -> Result<impl IntoResponse, AppError> {
    let email = Email::parse(&input.email).map_err(|e| AppError::Validation(e.to_string()))?;

    let invite_repo = StaffInviteRepository::new(state.pool());
    let invite = invite_repo
        .get_by_email(email.as_str())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no invite for {email}")))?;

    if invite.is_used() {
        return Err(AppError::Conflict("invite has already been used".to_owned()));
    }
    if invite.is_expired() {
        return Err(AppError::Conflict("invite has expired".to_owned()));
    }

    let staff_repo = StaffRepository::new(state.pool());
    let member = staff_repo
        .create(&invite.email, &invite.name, invite.role)
        .await?;
    invite_repo.mark_used(email.as_str(), member.id).await?;

    // Welcome mail and the joined notice are best-effort.
    if let Err(e) = state
        .email()
        .send_welcome(member.email.as_str(), &member.name)
        .await
    {
        tracing::warn!(email = %member.email, error = %e, "failed to send welcome email");
    }
    Notifier::new(state.pool()).staff_joined(&member).await;

    let current = CurrentStaff::from(&member);
    set_current_staff(&session, &current).await?;
    crate::error::set_sentry_user(current.id.as_i64(), Some(&current.email));

    Ok(created(member))
}
