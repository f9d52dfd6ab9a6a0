//! Staff domain types and session keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Email, StaffId, StaffRole};

/// A staff member (domain type).
#[derive(Debug, Clone, Serialize)]
pub struct StaffMember {
    /// Unique staff ID.
    pub id: StaffId,
    /// Staff member's email address.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Role/permission level.
    pub role: StaffRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The signed-in staff member as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStaff {
    /// Staff ID.
    pub id: StaffId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role/permission level.
    pub role: StaffRole,
}

impl From<&StaffMember> for CurrentStaff {
    fn from(member: &StaffMember) -> Self {
        Self {
            id: member.id,
            email: member.email.to_string(),
            name: member.name.clone(),
            role: member.role,
        }
    }
}

/// Keys under which values are stored in the session.
pub mod session_keys {
    /// The serialized [`super::CurrentStaff`].
    pub const CURRENT_STAFF: &str = "current_staff";
}
