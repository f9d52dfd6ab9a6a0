//! Notification fan-out.
//!
//! Notifications are best-effort: a failed insert is logged and never fails
//! the operation that triggered it.

use sqlx::PgPool;

use stockroom_core::{NotificationKind, StaffId};

use crate::db::NotificationRepository;
use crate::models::{Delivery, Product, StaffMember};

/// Writes notification records for the events the app cares about.
pub struct Notifier<'a> {
    pool: &'a PgPool,
}

impl<'a> Notifier<'a> {
    /// Create a new notifier over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn record(&self, recipient: Option<StaffId>, kind: NotificationKind, message: String) {
        let repo = NotificationRepository::new(self.pool);
        if let Err(e) = repo.create(recipient, kind, &message).await {
            tracing::warn!(kind = %kind, error = %e, "failed to record notification");
        }
    }

    /// Broadcast that a product's stock counter hit zero.
    pub async fn stock_depleted(&self, product: &Product) {
        self.record(
            None,
            NotificationKind::StockDepleted,
            format!("{} ({}) is out of stock", product.name, product.sku),
        )
        .await;
    }

    /// Broadcast that a delivery was scheduled.
    pub async fn delivery_scheduled(&self, delivery: &Delivery) {
        self.record(
            None,
            NotificationKind::DeliveryScheduled,
            format!(
                "Delivery for order {} scheduled with {} on {}",
                delivery.order_number, delivery.delivery_company, delivery.scheduled_date
            ),
        )
        .await;
    }

    /// Tell the assigned staff member (or everyone) a delivery changed status.
    pub async fn delivery_status_changed(&self, delivery: &Delivery) {
        self.record(
            delivery.assigned_to,
            NotificationKind::DeliveryUpdate,
            format!(
                "Delivery for order {} is now {}",
                delivery.order_number, delivery.status
            ),
        )
        .await;
    }

    /// Broadcast that an invite was accepted.
    pub async fn staff_joined(&self, member: &StaffMember) {
        self.record(
            None,
            NotificationKind::StaffJoined,
            format!("{} joined as {}", member.name, member.role),
        )
        .await;
    }
}
