//! Status and role enums for staff, deliveries, and notifications.

use serde::{Deserialize, Serialize};

/// Delivery lifecycle status.
///
/// Transitions form a small workflow:
///
/// ```text
/// scheduled ──> in_transit ──> delivered
///     │             │
///     └─────────────┴────────> cancelled
/// ```
///
/// `delivered` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[default]
    Scheduled,
    InTransit,
    Delivered,
    Cancelled,
}

impl DeliveryStatus {
    /// True once no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the workflow allows moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::InTransit | Self::Cancelled)
                | (Self::InTransit, Self::Delivered | Self::Cancelled)
        )
    }

    /// Database representation (snake_case).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeliveryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_transit" => Ok(Self::InTransit),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid delivery status: {s}")),
        }
    }
}

/// Staff role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Full access including staff management and invites.
    Manager,
    /// Day-to-day access: products, movements, deliveries.
    Clerk,
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manager => write!(f, "manager"),
            Self::Clerk => write!(f, "clerk"),
        }
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "clerk" => Ok(Self::Clerk),
            _ => Err(format!("invalid staff role: {s}")),
        }
    }
}

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A product's stock counter reached zero after an outbound movement.
    StockDepleted,
    /// A new delivery was scheduled.
    DeliveryScheduled,
    /// A delivery moved through its status workflow.
    DeliveryUpdate,
    /// A staff invite was accepted.
    StaffJoined,
}

impl NotificationKind {
    /// Database representation (snake_case).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StockDepleted => "stock_depleted",
            Self::DeliveryScheduled => "delivery_scheduled",
            Self::DeliveryUpdate => "delivery_update",
            Self::StaffJoined => "staff_joined",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock_depleted" => Ok(Self::StockDepleted),
            "delivery_scheduled" => Ok(Self::DeliveryScheduled),
            "delivery_update" => Ok(Self::DeliveryUpdate),
            "staff_joined" => Ok(Self::StaffJoined),
            _ => Err(format!("invalid notification kind: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_workflow_allows_forward_transitions() {
        assert!(DeliveryStatus::Scheduled.can_transition_to(DeliveryStatus::InTransit));
        assert!(DeliveryStatus::Scheduled.can_transition_to(DeliveryStatus::Cancelled));
        assert!(DeliveryStatus::InTransit.can_transition_to(DeliveryStatus::Delivered));
        assert!(DeliveryStatus::InTransit.can_transition_to(DeliveryStatus::Cancelled));
    }

    #[test]
    fn test_delivery_workflow_rejects_skips_and_reversals() {
        assert!(!DeliveryStatus::Scheduled.can_transition_to(DeliveryStatus::Delivered));
        assert!(!DeliveryStatus::InTransit.can_transition_to(DeliveryStatus::Scheduled));
        assert!(!DeliveryStatus::Delivered.can_transition_to(DeliveryStatus::InTransit));
        assert!(!DeliveryStatus::Cancelled.can_transition_to(DeliveryStatus::Scheduled));
    }

    #[test]
    fn test_delivery_workflow_rejects_self_transitions() {
        for status in [
            DeliveryStatus::Scheduled,
            DeliveryStatus::InTransit,
            DeliveryStatus::Delivered,
            DeliveryStatus::Cancelled,
        ] {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!DeliveryStatus::Scheduled.is_terminal());
        assert!(!DeliveryStatus::InTransit.is_terminal());
        assert!(DeliveryStatus::Delivered.is_terminal());
        assert!(DeliveryStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_role_str_roundtrip() {
        for role in [StaffRole::Manager, StaffRole::Clerk] {
            let parsed: StaffRole = role.to_string().parse().expect("parse");
            assert_eq!(parsed, role);
        }
        assert!("owner".parse::<StaffRole>().is_err());
    }

    #[test]
    fn test_notification_kind_str_roundtrip() {
        for kind in [
            NotificationKind::StockDepleted,
            NotificationKind::DeliveryScheduled,
            NotificationKind::DeliveryUpdate,
            NotificationKind::StaffJoined,
        ] {
            let parsed: NotificationKind = kind.as_str().parse().expect("parse");
            assert_eq!(parsed, kind);
        }
    }
}
