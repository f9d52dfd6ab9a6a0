//! Session and authentication middleware.

pub mod auth;
pub mod session;

pub use auth::{RequireManager, RequireStaff};
pub use session::create_session_layer;
