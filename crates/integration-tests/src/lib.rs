//! Shared helpers for Stockroom integration tests.
//!
//! Database-backed tests only run when `STOCKROOM_TEST_DATABASE_URL` is set;
//! without it they skip silently so the suite passes on machines with no
//! `PostgreSQL` available.

#![cfg_attr(not(test), forbid(unsafe_code))]

use secrecy::SecretString;
use sqlx::PgPool;

/// Connect to the test database and bring its schema up to date.
///
/// Returns `None` (skip) when `STOCKROOM_TEST_DATABASE_URL` is not set.
///
/// # Panics
///
/// Panics if the variable is set but the database is unreachable or a
/// migration fails - a misconfigured test environment should be loud.
pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("STOCKROOM_TEST_DATABASE_URL").ok()?;

    let pool = stockroom_server::db::create_pool(&SecretString::from(url))
        .await
        .expect("test database unreachable");

    sqlx::migrate!("../server/migrations")
        .run(&pool)
        .await
        .expect("migrations failed on test database");

    Some(pool)
}

/// A suffix unique enough to keep test fixtures (SKUs, emails) from
/// colliding across runs against the same database.
#[must_use]
pub fn unique_suffix() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();
    format!("{nanos:x}")
}
