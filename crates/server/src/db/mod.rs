//! Database operations for the `stockroom` `PostgreSQL` schema.
//!
//! ## Tables
//!
//! - `product` - Product catalog with the stock counter
//! - `movement` - The stock-movement ledger
//! - `staff` - Staff accounts
//! - `staff_invite` - Invite allowlist for staff registration
//! - `delivery` - Scheduled deliveries and their workflow status
//! - `notification` - Staff notifications
//! - `session` - tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p stockroom-cli -- migrate
//! ```

pub mod deliveries;
pub mod invites;
pub mod movements;
pub mod notifications;
pub mod products;
pub mod staff;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use deliveries::DeliveryRepository;
pub use invites::{StaffInvite, StaffInviteRepository};
pub use notifications::NotificationRepository;
pub use staff::StaffRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique SKU).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
