//! Application services.
//!
//! - [`ledger`] - the stock ledger keeping `product.stock` in sync with the
//!   movement table
//! - [`email`] - SMTP delivery of invite and welcome mail
//! - [`notify`] - notification fan-out

pub mod email;
pub mod ledger;
pub mod notify;

pub use email::EmailService;
pub use ledger::StockLedger;
pub use notify::Notifier;
