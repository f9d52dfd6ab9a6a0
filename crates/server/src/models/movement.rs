//! Stock movement domain types and input validation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockroom_core::{MovementId, MovementKind, ProductId, StaffId};

/// A ledger entry recording one change to a product's stock.
#[derive(Debug, Clone, Serialize)]
pub struct Movement {
    /// Unique movement ID.
    pub id: MovementId,
    /// Movement kind; determines the sign of the stock delta.
    pub kind: MovementKind,
    /// Units moved. Always positive; the sign comes from `kind`.
    pub quantity: i64,
    /// Product whose stock this movement adjusts.
    pub product_id: ProductId,
    /// Staff member who recorded the movement.
    pub recorded_by: StaffId,
    /// Date the goods arrived (ARRIVAL).
    pub arrival_date: Option<NaiveDate>,
    /// Date the goods were handed over (DELIVERY).
    pub delivery_date: Option<NaiveDate>,
    /// Carrier handling the delivery (DELIVERY).
    pub delivery_company: Option<String>,
    /// Person who collected the goods (PICKUP).
    pub pickup_by: Option<String>,
    /// Date the goods were collected (PICKUP).
    pub pickup_date: Option<NaiveDate>,
    /// Order reference (PICKUP, DELIVERY).
    pub order_number: Option<String>,
    /// SKU quoted by the picker (PICKUP).
    pub sku: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the movement was recorded.
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// The signed delta this movement contributes to its product's stock.
    #[must_use]
    pub const fn signed_delta(&self) -> i64 {
        self.kind.signed_delta(self.quantity)
    }
}

/// A movement enriched with display names from read-side joins.
///
/// The names are not part of the stored entity.
#[derive(Debug, Clone, Serialize)]
pub struct MovementWithContext {
    /// The stored movement.
    #[serde(flatten)]
    pub movement: Movement,
    /// Name of the product at read time.
    pub product_name: String,
    /// Name of the staff member who recorded it.
    pub recorded_by_name: String,
}

/// Validation failure for a movement payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MovementValidationError {
    /// Quantity was zero or negative.
    #[error("quantity must be a positive integer")]
    NonPositiveQuantity,

    /// Kind-specific required fields were absent.
    #[error("{kind} movement missing required fields: {}", .missing.join(", "))]
    MissingFields {
        /// The movement kind being validated.
        kind: MovementKind,
        /// Names of the absent required fields.
        missing: Vec<&'static str>,
    },
}

/// Payload for creating or updating a movement.
///
/// Quantity is always positive from the caller's perspective; the sign of
/// the stock effect is derived from `kind`, never supplied directly.
#[derive(Debug, Clone, Deserialize)]
pub struct MovementInput {
    /// Product whose stock the movement adjusts.
    pub product_id: ProductId,
    /// Movement kind.
    pub kind: MovementKind,
    /// Units moved (positive).
    pub quantity: i64,
    /// Date the goods arrived (required for ARRIVAL).
    #[serde(default)]
    pub arrival_date: Option<NaiveDate>,
    /// Date the goods were handed over (required for DELIVERY).
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    /// Carrier handling the delivery (required for DELIVERY).
    #[serde(default)]
    pub delivery_company: Option<String>,
    /// Person who collected the goods (required for PICKUP).
    #[serde(default)]
    pub pickup_by: Option<String>,
    /// Date the goods were collected (required for PICKUP).
    #[serde(default)]
    pub pickup_date: Option<NaiveDate>,
    /// Order reference (required for PICKUP and DELIVERY).
    #[serde(default)]
    pub order_number: Option<String>,
    /// SKU quoted by the picker (required for PICKUP).
    #[serde(default)]
    pub sku: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// True when an optional text field is present and non-blank.
fn present(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.trim().is_empty())
}

impl MovementInput {
    /// Validate the payload against the rules for its declared kind.
    ///
    /// # Errors
    ///
    /// Returns [`MovementValidationError::NonPositiveQuantity`] when the
    /// quantity is not positive, or [`MovementValidationError::MissingFields`]
    /// naming every absent kind-specific field.
    pub fn validate(&self) -> Result<(), MovementValidationError> {
        if self.quantity <= 0 {
            return Err(MovementValidationError::NonPositiveQuantity);
        }

        let mut missing = Vec::new();
        match self.kind {
            MovementKind::Arrival => {
                if self.arrival_date.is_none() {
                    missing.push("arrival_date");
                }
            }
            MovementKind::Delivery => {
                if self.delivery_date.is_none() {
                    missing.push("delivery_date");
                }
                if !present(self.delivery_company.as_deref()) {
                    missing.push("delivery_company");
                }
                if !present(self.order_number.as_deref()) {
                    missing.push("order_number");
                }
            }
            MovementKind::Pickup => {
                if !present(self.pickup_by.as_deref()) {
                    missing.push("pickup_by");
                }
                if self.pickup_date.is_none() {
                    missing.push("pickup_date");
                }
                if !present(self.order_number.as_deref()) {
                    missing.push("order_number");
                }
                if !present(self.sku.as_deref()) {
                    missing.push("sku");
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(MovementValidationError::MissingFields {
                kind: self.kind,
                missing,
            })
        }
    }

    /// The signed delta this payload would contribute to the product's stock.
    #[must_use]
    pub const fn signed_delta(&self) -> i64 {
        self.kind.signed_delta(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(kind: MovementKind) -> MovementInput {
        MovementInput {
            product_id: ProductId::new(1),
            kind,
            quantity: 5,
            arrival_date: None,
            delivery_date: None,
            delivery_company: None,
            pickup_by: None,
            pickup_date: None,
            order_number: None,
            sku: None,
            notes: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date")
    }

    #[test]
    fn test_arrival_requires_arrival_date() {
        let input = base(MovementKind::Arrival);
        assert_eq!(
            input.validate(),
            Err(MovementValidationError::MissingFields {
                kind: MovementKind::Arrival,
                missing: vec!["arrival_date"],
            })
        );

        let mut input = base(MovementKind::Arrival);
        input.arrival_date = Some(date("2026-08-01"));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_delivery_lists_all_missing_fields() {
        let input = base(MovementKind::Delivery);
        let err = input.validate().expect_err("invalid");
        assert_eq!(
            err,
            MovementValidationError::MissingFields {
                kind: MovementKind::Delivery,
                missing: vec!["delivery_date", "delivery_company", "order_number"],
            }
        );
    }

    #[test]
    fn test_pickup_requires_all_four_fields() {
        let mut input = base(MovementKind::Pickup);
        input.pickup_by = Some("M. Janssen".to_owned());
        input.pickup_date = Some(date("2026-08-02"));
        let err = input.validate().expect_err("invalid");
        assert_eq!(
            err,
            MovementValidationError::MissingFields {
                kind: MovementKind::Pickup,
                missing: vec!["order_number", "sku"],
            }
        );

        input.order_number = Some("ORD-1042".to_owned());
        input.sku = Some("BR-1200".to_owned());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let mut input = base(MovementKind::Delivery);
        input.delivery_date = Some(date("2026-08-03"));
        input.delivery_company = Some("   ".to_owned());
        input.order_number = Some("ORD-7".to_owned());
        let err = input.validate().expect_err("invalid");
        assert_eq!(
            err,
            MovementValidationError::MissingFields {
                kind: MovementKind::Delivery,
                missing: vec!["delivery_company"],
            }
        );
    }

    #[test]
    fn test_quantity_must_be_positive() {
        for quantity in [0, -3] {
            let mut input = base(MovementKind::Arrival);
            input.arrival_date = Some(date("2026-08-01"));
            input.quantity = quantity;
            assert_eq!(
                input.validate(),
                Err(MovementValidationError::NonPositiveQuantity)
            );
        }
    }

    #[test]
    fn test_signed_delta_follows_kind() {
        let mut input = base(MovementKind::Arrival);
        input.quantity = 7;
        assert_eq!(input.signed_delta(), 7);
        input.kind = MovementKind::Pickup;
        assert_eq!(input.signed_delta(), -7);
    }

    #[test]
    fn test_validation_error_message_lists_fields() {
        let err = MovementValidationError::MissingFields {
            kind: MovementKind::Pickup,
            missing: vec!["pickup_by", "sku"],
        };
        assert_eq!(
            err.to_string(),
            "pickup movement missing required fields: pickup_by, sku"
        );
    }
}
