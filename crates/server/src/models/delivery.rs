//! Delivery domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DeliveryId, DeliveryStatus, MovementId, ProductId, StaffId};

/// A scheduled delivery moving through its status workflow.
#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
    /// Unique delivery ID.
    pub id: DeliveryId,
    /// Customer order reference.
    pub order_number: String,
    /// Carrier handling the delivery.
    pub delivery_company: String,
    /// Product being delivered, when known.
    pub product_id: Option<ProductId>,
    /// The DELIVERY ledger movement this delivery fulfils, when linked.
    pub movement_id: Option<MovementId>,
    /// Date the delivery is scheduled for.
    pub scheduled_date: NaiveDate,
    /// Current workflow status.
    pub status: DeliveryStatus,
    /// Staff member responsible for the delivery.
    pub assigned_to: Option<StaffId>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// When the delivery was scheduled.
    pub created_at: DateTime<Utc>,
    /// When the delivery was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Payload for scheduling a delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDeliveryInput {
    /// Customer order reference.
    pub order_number: String,
    /// Carrier handling the delivery.
    pub delivery_company: String,
    /// Date the delivery is scheduled for.
    pub scheduled_date: NaiveDate,
    /// Product being delivered, when known.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Ledger movement this delivery fulfils, when linked.
    #[serde(default)]
    pub movement_id: Option<MovementId>,
    /// Staff member responsible for the delivery.
    #[serde(default)]
    pub assigned_to: Option<StaffId>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl ScheduleDeliveryInput {
    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when the order number or carrier is
    /// blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.order_number.trim().is_empty() {
            return Err("order_number must not be empty".to_owned());
        }
        if self.delivery_company.trim().is_empty() {
            return Err("delivery_company must not be empty".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_order_number() {
        let input = ScheduleDeliveryInput {
            order_number: " ".to_owned(),
            delivery_company: "PostNL".to_owned(),
            scheduled_date: "2026-08-10".parse().expect("valid date"),
            product_id: None,
            movement_id: None,
            assigned_to: None,
            notes: None,
        };
        assert!(input.validate().is_err());
    }
}
