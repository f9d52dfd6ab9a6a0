//! Logic-level tests of the stock ledger rules: the sign mapping, the net
//! delta used by updates, and payload validation. These exercise the same
//! arithmetic the database-backed ledger applies, without a database.

use stockroom_core::{MovementKind, ProductId};
use stockroom_server::models::{MovementInput, MovementValidationError};
use stockroom_server::services::ledger::net_delta;

fn input(kind: MovementKind, quantity: i64) -> MovementInput {
    MovementInput {
        product_id: ProductId::new(1),
        kind,
        quantity,
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

fn valid_arrival(quantity: i64) -> MovementInput {
    let mut payload = input(MovementKind::Arrival, quantity);
    payload.arrival_date = Some("2026-08-01".parse().expect("valid date"));
    payload
}

fn valid_delivery(quantity: i64) -> MovementInput {
    let mut payload = input(MovementKind::Delivery, quantity);
    payload.delivery_date = Some("2026-08-02".parse().expect("valid date"));
    payload.delivery_company = Some("PostNL".to_owned());
    payload.order_number = Some("ORD-1042".to_owned());
    payload
}

// =============================================================================
// Sign and delta arithmetic
// =============================================================================

#[test]
fn test_arrival_contributes_plus_quantity() {
    assert_eq!(valid_arrival(5).signed_delta(), 5);
}

#[test]
fn test_pickup_and_delivery_contribute_minus_quantity() {
    assert_eq!(valid_delivery(15).signed_delta(), -15);
    assert_eq!(MovementKind::Pickup.signed_delta(6), -6);
}

#[test]
fn test_update_net_delta_equals_delete_then_create() {
    let cases = [
        ((MovementKind::Arrival, 5), (MovementKind::Arrival, 9)),
        ((MovementKind::Arrival, 5), (MovementKind::Delivery, 3)),
        ((MovementKind::Pickup, 4), (MovementKind::Arrival, 4)),
        ((MovementKind::Delivery, 7), (MovementKind::Pickup, 7)),
    ];

    for (old, new) in cases {
        let net = net_delta(old, new);
        let delete_then_create = -old.0.signed_delta(old.1) + new.0.signed_delta(new.1);
        assert_eq!(net, delete_then_create, "case {old:?} -> {new:?}");
    }
}

#[test]
fn test_stock_ten_scenario_arithmetic() {
    // Product starts at stock 10.
    let mut stock = 10;

    // ARRIVAL quantity 5 -> 15
    stock += valid_arrival(5).signed_delta();
    assert_eq!(stock, 15);

    // DELIVERY quantity 20 would go negative: guard rejects, stock unchanged
    let rejected = stock + valid_delivery(20).signed_delta();
    assert!(rejected < 0);
    assert_eq!(stock, 15);

    // DELIVERY quantity 15 -> 0
    stock += valid_delivery(15).signed_delta();
    assert_eq!(stock, 0);

    // Deleting that delivery restores 15
    stock += -valid_delivery(15).signed_delta();
    assert_eq!(stock, 15);
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_arrival_without_date_is_rejected_with_field_name() {
    let payload = input(MovementKind::Arrival, 5);
    let err = payload.validate().expect_err("must be invalid");
    assert_eq!(
        err,
        MovementValidationError::MissingFields {
            kind: MovementKind::Arrival,
            missing: vec!["arrival_date"],
        }
    );
}

#[test]
fn test_pickup_requires_its_four_fields() {
    let err = input(MovementKind::Pickup, 2).validate().expect_err("invalid");
    assert_eq!(
        err,
        MovementValidationError::MissingFields {
            kind: MovementKind::Pickup,
            missing: vec!["pickup_by", "pickup_date", "order_number", "sku"],
        }
    );
}

#[test]
fn test_zero_and_negative_quantities_are_rejected() {
    assert_eq!(
        valid_arrival(0).validate(),
        Err(MovementValidationError::NonPositiveQuantity)
    );
    assert_eq!(
        valid_delivery(-4).validate(),
        Err(MovementValidationError::NonPositiveQuantity)
    );
}

#[test]
fn test_valid_payloads_pass() {
    assert!(valid_arrival(1).validate().is_ok());
    assert!(valid_delivery(1).validate().is_ok());
}

// =============================================================================
// Wire format
// =============================================================================

#[test]
fn test_movement_input_deserializes_from_api_shape() {
    let payload: MovementInput = serde_json::from_str(
        r#"{
            "product_id": 3,
            "kind": "ARRIVAL",
            "quantity": 12,
            "arrival_date": "2026-08-01",
            "notes": "morning truck"
        }"#,
    )
    .expect("deserializes");

    assert_eq!(payload.kind, MovementKind::Arrival);
    assert_eq!(payload.quantity, 12);
    assert!(payload.validate().is_ok());
}

#[test]
fn test_unknown_kind_is_rejected_at_deserialization() {
    let result = serde_json::from_str::<MovementInput>(
        r#"{ "product_id": 3, "kind": "RESTOCK", "quantity": 1 }"#,
    );
    assert!(result.is_err());
}
