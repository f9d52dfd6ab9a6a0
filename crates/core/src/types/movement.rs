//! Stock movement kind and its signed contribution to stock.

use serde::{Deserialize, Serialize};

/// The kind of a stock movement.
///
/// The sign of a movement's effect on stock is derived from its kind and
/// never supplied by callers. [`MovementKind::sign`] is the single place
/// that mapping lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Goods received into stock.
    Arrival,
    /// Goods collected in person by a customer.
    Pickup,
    /// Goods handed to a delivery company.
    Delivery,
}

impl MovementKind {
    /// Sign of this kind's contribution to stock: +1 for arrivals,
    /// -1 for pickups and deliveries.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Arrival => 1,
            Self::Pickup | Self::Delivery => -1,
        }
    }

    /// The signed delta a movement of this kind and `quantity` applies to
    /// the product's stock counter.
    #[must_use]
    pub const fn signed_delta(self, quantity: i64) -> i64 {
        self.sign() * quantity
    }

    /// True for kinds that take stock out (pickups and deliveries).
    #[must_use]
    pub const fn is_outbound(self) -> bool {
        self.sign() < 0
    }

    /// Database representation (lowercase).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arrival => "arrival",
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arrival" => Ok(Self::Arrival),
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            _ => Err(format!("invalid movement kind: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_mapping() {
        assert_eq!(MovementKind::Arrival.sign(), 1);
        assert_eq!(MovementKind::Pickup.sign(), -1);
        assert_eq!(MovementKind::Delivery.sign(), -1);
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(MovementKind::Arrival.signed_delta(5), 5);
        assert_eq!(MovementKind::Pickup.signed_delta(5), -5);
        assert_eq!(MovementKind::Delivery.signed_delta(12), -12);
    }

    #[test]
    fn test_outbound() {
        assert!(!MovementKind::Arrival.is_outbound());
        assert!(MovementKind::Pickup.is_outbound());
        assert!(MovementKind::Delivery.is_outbound());
    }

    #[test]
    fn test_json_names_are_screaming_snake_case() {
        let json = serde_json::to_string(&MovementKind::Arrival).expect("serialize");
        assert_eq!(json, "\"ARRIVAL\"");
        let kind: MovementKind = serde_json::from_str("\"DELIVERY\"").expect("deserialize");
        assert_eq!(kind, MovementKind::Delivery);
    }

    #[test]
    fn test_db_roundtrip_via_str() {
        for kind in [
            MovementKind::Arrival,
            MovementKind::Pickup,
            MovementKind::Delivery,
        ] {
            let parsed: MovementKind = kind.as_str().parse().expect("parse");
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("restock".parse::<MovementKind>().is_err());
    }
}
