//! Staff invite commands.

use stockroom_core::{Email, StaffRole};
use stockroom_server::db::StaffInviteRepository;

use super::CommandError;

/// Create a staff invite without going through the web UI.
///
/// No invite email is sent; tell the invitee to register with this address.
///
/// # Errors
///
/// Returns an error for invalid input, a duplicate invite, or database
/// failures.
pub async fn create(email: &str, name: &str, role: &str, days: i32) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(|e| CommandError::InvalidInput(e.to_string()))?;
    let role: StaffRole = role.parse().map_err(CommandError::InvalidInput)?;
    if days <= 0 {
        return Err(CommandError::InvalidInput(
            "days must be positive".to_owned(),
        ));
    }

    let pool = super::connect().await?;
    let invite = StaffInviteRepository::new(&pool)
        .create(&email, name.trim(), role, None, days)
        .await?;

    tracing::info!(
        id = %invite.id,
        email = %invite.email,
        expires_at = %invite.expires_at,
        "invite created"
    );
    Ok(())
}
