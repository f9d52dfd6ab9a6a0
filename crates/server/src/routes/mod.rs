//! HTTP route handlers.
//!
//! Every `/api` response is the JSON envelope
//! `{ "success": bool, "data"?, "error"? }`. Except for invite acceptance,
//! all `/api` routes require a signed-in staff session.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Liveness check
//! GET    /health/ready                  - Readiness check (probes the database)
//!
//! # Products
//! GET    /api/products                  - List products (optional ?search=)
//! POST   /api/products                  - Create product
//! GET    /api/products/{id}             - Product detail
//! PUT    /api/products/{id}             - Administrative edit (never stock)
//! DELETE /api/products/{id}             - Delete (409 while movements reference it)
//!
//! # Movements (the stock ledger)
//! GET    /api/movements                 - List movements, newest first
//! POST   /api/movements                 - Record movement, adjust stock
//! PUT    /api/movements/{id}            - Edit movement, reconcile stock
//! DELETE /api/movements/{id}            - Remove movement, reverse stock
//!
//! # Deliveries
//! GET    /api/deliveries                - List deliveries (optional ?status=)
//! POST   /api/deliveries                - Schedule delivery
//! GET    /api/deliveries/{id}           - Delivery detail
//! POST   /api/deliveries/{id}/status    - Workflow transition
//!
//! # Staff (manager only except list)
//! GET    /api/staff                     - List staff
//! DELETE /api/staff/{id}                - Remove staff member
//! GET    /api/staff/invites             - List invites
//! POST   /api/staff/invites             - Create invite, send email
//! POST   /api/staff/invites/accept      - Accept invite (no session required)
//!
//! # Notifications
//! GET    /api/notifications             - Own + broadcast, unread first
//! POST   /api/notifications/{id}/read   - Mark read
//!
//! # Auth
//! GET    /api/auth/me                   - Current staff member
//! POST   /api/auth/logout               - Sign out
//! ```

pub mod auth;
pub mod deliveries;
pub mod movements;
pub mod notifications;
pub mod products;
pub mod staff;

use axum::{Json, Router, http::StatusCode};
use serde::Serialize;

use crate::state::AppState;

/// The JSON response envelope used by every `/api` endpoint.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 200 OK envelope.
pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<ApiEnvelope<T>>) {
    (
        StatusCode::OK,
        Json(ApiEnvelope {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
}

/// 201 Created envelope.
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiEnvelope<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiEnvelope {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
}

/// Build the application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(products::routes())
        .merge(movements::routes())
        .merge(deliveries::routes())
        .merge(staff::routes())
        .merge(notifications::routes())
        .merge(auth::routes())
}
