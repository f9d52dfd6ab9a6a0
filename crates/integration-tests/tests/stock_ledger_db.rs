//! Database-backed tests for the stock ledger.
//!
//! These verify the ledger invariant against a real `PostgreSQL` instance:
//! set `STOCKROOM_TEST_DATABASE_URL` to run them, otherwise they skip.

use sqlx::PgPool;

use stockroom_core::{Email, MovementKind, ProductId, Sku, StaffId, StaffRole};
use stockroom_integration_tests::{test_pool, unique_suffix};
use stockroom_server::db;
use stockroom_server::db::StaffRepository;
use stockroom_server::models::MovementInput;
use stockroom_server::services::StockLedger;
use stockroom_server::services::ledger::LedgerError;

async fn fixture_staff(pool: &PgPool) -> StaffId {
    let email = Email::parse(&format!("clerk-{}@example.com", unique_suffix()))
        .expect("valid email");
    StaffRepository::new(pool)
        .create(&email, "Test Clerk", StaffRole::Clerk)
        .await
        .expect("staff created")
        .id
}

async fn fixture_product(pool: &PgPool, opening_stock: i64) -> ProductId {
    let sku = Sku::parse(&format!("TST-{}", unique_suffix())).expect("valid sku");
    db::products::create_product(pool, "Test product", &sku, None, None, opening_stock)
        .await
        .expect("product created")
        .id
}

async fn stock_of(pool: &PgPool, id: ProductId) -> i64 {
    db::products::get_stock(pool, id)
        .await
        .expect("stock readable")
        .expect("product exists")
}

async fn movement_count(pool: &PgPool, id: ProductId) -> usize {
    db::movements::list_movements(pool, Some(id), 500, 0)
        .await
        .expect("movements listable")
        .len()
}

fn arrival(product_id: ProductId, quantity: i64) -> MovementInput {
    MovementInput {
        product_id,
        kind: MovementKind::Arrival,
        quantity,
        arrival_date: Some("2026-08-01".parse().expect("valid date")),
        delivery_date: None,
        delivery_company: None,
        pickup_by: None,
        pickup_date: None,
        order_number: None,
        sku: None,
        notes: None,
    }
}

fn delivery(product_id: ProductId, quantity: i64) -> MovementInput {
    MovementInput {
        product_id,
        kind: MovementKind::Delivery,
        quantity,
        arrival_date: None,
        delivery_date: Some("2026-08-02".parse().expect("valid date")),
        delivery_company: Some("PostNL".to_owned()),
        pickup_by: None,
        pickup_date: None,
        order_number: Some("ORD-1042".to_owned()),
        sku: None,
        notes: None,
    }
}

fn pickup(product_id: ProductId, quantity: i64) -> MovementInput {
    MovementInput {
        product_id,
        kind: MovementKind::Pickup,
        quantity,
        arrival_date: None,
        delivery_date: None,
        delivery_company: None,
        pickup_by: Some("M. Janssen".to_owned()),
        pickup_date: Some("2026-08-03".parse().expect("valid date")),
        order_number: Some("ORD-2044".to_owned()),
        sku: Some("TST-PICKUP".to_owned()),
        notes: None,
    }
}

#[tokio::test]
async fn test_arrival_increases_stock_by_quantity() {
    let Some(pool) = test_pool().await else { return };
    let staff = fixture_staff(&pool).await;
    let product = fixture_product(&pool, 3).await;
    let ledger = StockLedger::new(&pool);

    let outcome = ledger
        .create_movement(&arrival(product, 9), staff)
        .await
        .expect("arrival recorded");

    assert_eq!(outcome.stock_after, 12);
    assert_eq!(stock_of(&pool, product).await, 12);
    assert_eq!(outcome.movement.movement.quantity, 9);
    assert_eq!(outcome.movement.product_name, "Test product");
}

#[tokio::test]
async fn test_insufficient_stock_rejects_without_any_write() {
    let Some(pool) = test_pool().await else { return };
    let staff = fixture_staff(&pool).await;
    let product = fixture_product(&pool, 3).await;
    let ledger = StockLedger::new(&pool);

    let err = ledger
        .create_movement(&delivery(product, 4), staff)
        .await
        .expect_err("must fail");

    assert!(matches!(
        err,
        LedgerError::InsufficientStock { available: 3, requested: 4, .. }
    ));
    assert_eq!(stock_of(&pool, product).await, 3, "stock unchanged");
    assert_eq!(movement_count(&pool, product).await, 0, "no movement row");
}

#[tokio::test]
async fn test_validation_failure_changes_nothing() {
    let Some(pool) = test_pool().await else { return };
    let staff = fixture_staff(&pool).await;
    let product = fixture_product(&pool, 5).await;
    let ledger = StockLedger::new(&pool);

    let mut payload = arrival(product, 2);
    payload.arrival_date = None;

    let err = ledger
        .create_movement(&payload, staff)
        .await
        .expect_err("must fail");

    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(stock_of(&pool, product).await, 5);
    assert_eq!(movement_count(&pool, product).await, 0);
}

#[tokio::test]
async fn test_delete_restores_stock_exactly() {
    let Some(pool) = test_pool().await else { return };
    let staff = fixture_staff(&pool).await;
    let product = fixture_product(&pool, 10).await;
    let ledger = StockLedger::new(&pool);

    let outcome = ledger
        .create_movement(&pickup(product, 4), staff)
        .await
        .expect("pickup recorded");
    assert_eq!(outcome.stock_after, 6);

    let removed = ledger
        .delete_movement(outcome.movement.movement.id)
        .await
        .expect("movement removed");

    assert_eq!(removed.stock_after, 10);
    assert_eq!(stock_of(&pool, product).await, 10);
    assert_eq!(movement_count(&pool, product).await, 0);
}

#[tokio::test]
async fn test_update_composes_to_delete_then_create() {
    let Some(pool) = test_pool().await else { return };
    let staff = fixture_staff(&pool).await;
    let product = fixture_product(&pool, 50).await;
    let ledger = StockLedger::new(&pool);

    // ARRIVAL 5: 50 -> 55
    let outcome = ledger
        .create_movement(&arrival(product, 5), staff)
        .await
        .expect("arrival recorded");
    assert_eq!(outcome.stock_after, 55);

    // Update to DELIVERY 12: end state must equal 50 - 12
    let updated = ledger
        .update_movement(outcome.movement.movement.id, &delivery(product, 12))
        .await
        .expect("movement updated");

    assert_eq!(updated.stock_after, 38);
    assert_eq!(stock_of(&pool, product).await, 38);
    assert_eq!(updated.movement.movement.kind, MovementKind::Delivery);
    assert_eq!(updated.movement.movement.quantity, 12);
}

#[tokio::test]
async fn test_update_rejection_leaves_original_intact() {
    let Some(pool) = test_pool().await else { return };
    let staff = fixture_staff(&pool).await;
    let product = fixture_product(&pool, 10).await;
    let ledger = StockLedger::new(&pool);

    let outcome = ledger
        .create_movement(&delivery(product, 5), staff)
        .await
        .expect("delivery recorded");
    assert_eq!(outcome.stock_after, 5);

    // Raising the delivery to 20 needs 15 more than the 5 available: the
    // net-delta adjustment rejects and nothing changes.
    let err = ledger
        .update_movement(outcome.movement.movement.id, &delivery(product, 20))
        .await
        .expect_err("must fail");
    assert!(matches!(err, LedgerError::InsufficientStock { .. }));

    assert_eq!(stock_of(&pool, product).await, 5, "no partial reversal");
    let kept = db::movements::get_movement(&pool, outcome.movement.movement.id)
        .await
        .expect("readable")
        .expect("still present");
    assert_eq!(kept.quantity, 5, "original movement untouched");
}

#[tokio::test]
async fn test_stock_ten_scenario_end_to_end() {
    let Some(pool) = test_pool().await else { return };
    let staff = fixture_staff(&pool).await;
    let product = fixture_product(&pool, 10).await;
    let ledger = StockLedger::new(&pool);

    let outcome = ledger
        .create_movement(&arrival(product, 5), staff)
        .await
        .expect("arrival recorded");
    assert_eq!(outcome.stock_after, 15);

    let err = ledger
        .create_movement(&delivery(product, 20), staff)
        .await
        .expect_err("must fail");
    assert!(matches!(err, LedgerError::InsufficientStock { .. }));
    assert_eq!(stock_of(&pool, product).await, 15);

    let outcome = ledger
        .create_movement(&delivery(product, 15), staff)
        .await
        .expect("delivery recorded");
    assert_eq!(outcome.stock_after, 0);

    let removed = ledger
        .delete_movement(outcome.movement.movement.id)
        .await
        .expect("delivery removed");
    assert_eq!(removed.stock_after, 15);
}

#[tokio::test]
async fn test_concurrent_pickups_cannot_both_succeed() {
    let Some(pool) = test_pool().await else { return };
    let staff = fixture_staff(&pool).await;
    let product = fixture_product(&pool, 10).await;
    let ledger = StockLedger::new(&pool);

    // Two pickups of 6 against stock 10, racing without any serialization
    // above the database. The guarded atomic adjustment must let at most
    // one of them through.
    let first_pickup = pickup(product, 6);
    let second_pickup = pickup(product, 6);
    let (first, second) = tokio::join!(
        ledger.create_movement(&first_pickup, staff),
        ledger.create_movement(&second_pickup, staff),
    );

    let successes = usize::from(first.is_ok()) + usize::from(second.is_ok());
    assert_eq!(successes, 1, "exactly one pickup may win the race");

    for result in [first, second] {
        if let Err(err) = result {
            assert!(matches!(err, LedgerError::InsufficientStock { .. }));
        }
    }

    assert_eq!(stock_of(&pool, product).await, 4);
    assert_eq!(movement_count(&pool, product).await, 1);
}
