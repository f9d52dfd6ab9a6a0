//! Stockroom server library.
//!
//! This crate provides the inventory and delivery-tracking application as a
//! library, allowing it to be tested and reused by the CLI.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API
//! - `PostgreSQL` via sqlx for products, the movement ledger, staff,
//!   deliveries, notifications, and sessions
//! - lettre + SMTP for invite and welcome mail
//!
//! The one piece of logic that is more than CRUD lives in
//! [`services::ledger`]: the stock ledger that keeps each product's stock
//! counter equal to the signed sum of its movements, using atomic guarded
//! adjustments inside per-operation transactions.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
