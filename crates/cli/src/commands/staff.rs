//! Staff management commands.

use stockroom_core::{Email, StaffRole};
use stockroom_server::db::StaffRepository;

use super::CommandError;

/// Create a staff member directly, bypassing the invite flow.
///
/// This is how the first manager account is bootstrapped.
///
/// # Errors
///
/// Returns an error for invalid input, a duplicate email, or database
/// failures.
pub async fn create(email: &str, name: &str, role: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;
    let role: StaffRole = role.parse().map_err(CommandError::InvalidInput)?;
    if name.trim().is_empty() {
        return Err(CommandError::InvalidInput(
            "name must not be empty".to_owned(),
        ));
    }

    let pool = super::connect().await?;
    let member = StaffRepository::new(&pool)
        .create(&email, name.trim(), role)
        .await?;

    tracing::info!(
        id = %member.id,
        email = %member.email,
        role = %member.role,
        "staff member created"
    );
    Ok(())
}
