//! Tests for the delivery status workflow.
//!
//! The transition table is small enough to verify exhaustively.

use stockroom_core::DeliveryStatus;

const ALL: [DeliveryStatus; 4] = [
    DeliveryStatus::Scheduled,
    DeliveryStatus::InTransit,
    DeliveryStatus::Delivered,
    DeliveryStatus::Cancelled,
];

#[test]
fn test_exhaustive_transition_table() {
    let allowed = [
        (DeliveryStatus::Scheduled, DeliveryStatus::InTransit),
        (DeliveryStatus::Scheduled, DeliveryStatus::Cancelled),
        (DeliveryStatus::InTransit, DeliveryStatus::Delivered),
        (DeliveryStatus::InTransit, DeliveryStatus::Cancelled),
    ];

    for from in ALL {
        for to in ALL {
            let expected = allowed.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "transition {from} -> {to}"
            );
        }
    }
}

#[test]
fn test_terminal_states_allow_nothing() {
    for from in [DeliveryStatus::Delivered, DeliveryStatus::Cancelled] {
        assert!(from.is_terminal());
        for to in ALL {
            assert!(!from.can_transition_to(to));
        }
    }
}

#[test]
fn test_every_non_terminal_state_can_be_cancelled() {
    for from in ALL {
        if !from.is_terminal() {
            assert!(from.can_transition_to(DeliveryStatus::Cancelled));
        }
    }
}

#[test]
fn test_status_serde_names() {
    let json = serde_json::to_string(&DeliveryStatus::InTransit).expect("serialize");
    assert_eq!(json, "\"in_transit\"");
    let status: DeliveryStatus = serde_json::from_str("\"delivered\"").expect("deserialize");
    assert_eq!(status, DeliveryStatus::Delivered);
}
