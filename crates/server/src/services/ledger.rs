//! The stock ledger: keeps `product.stock` equal to the signed sum of the
//! movements that reference it.
//!
//! Every operation here is one database transaction. The stock counter is
//! only ever changed through [`crate::db::products::adjust_stock`], a single
//! guarded server-side increment, so concurrent operations against the same
//! product serialize on the row and can never drive stock negative. Updates
//! apply the *net* delta (`new contribution - old contribution`) in one
//! adjustment, so there is no intermediate reversed state to observe or to
//! strand on failure.

use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use stockroom_core::{MovementId, MovementKind, ProductId, StaffId};

use crate::db::{self, RepositoryError};
use crate::error::AppError;
use crate::models::{Movement, MovementInput, MovementValidationError, MovementWithContext};

/// Errors from ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The movement payload failed validation.
    #[error(transparent)]
    Validation(#[from] MovementValidationError),

    /// The referenced product does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// The referenced movement does not exist.
    #[error("movement {0} not found")]
    MovementNotFound(MovementId),

    /// The adjustment would drive the product's stock below zero.
    #[error("insufficient stock for product {product_id}: {available} available")]
    InsufficientStock {
        /// Product whose stock would go negative.
        product_id: ProductId,
        /// Stock on hand at the time of the attempt.
        available: i64,
        /// Additional units the adjustment tried to take out.
        requested: i64,
    },

    /// Unexpected data-store failure.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(e) => Self::Validation(e.to_string()),
            LedgerError::ProductNotFound(_) | LedgerError::MovementNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::InsufficientStock {
                product_id,
                available,
                requested,
            } => Self::InsufficientStock {
                product_id,
                available,
                requested,
            },
            LedgerError::Store(e) => e.into(),
        }
    }
}

/// Net delta when a movement's contribution changes from `old` to `new`.
///
/// Applying this in one adjustment composes to the same end state as
/// delete-then-create, without the intermediate reversed state.
#[must_use]
pub const fn net_delta(old: (MovementKind, i64), new: (MovementKind, i64)) -> i64 {
    new.0.signed_delta(new.1) - old.0.signed_delta(old.1)
}

/// A movement written by the ledger, with the resulting stock level.
#[derive(Debug)]
pub struct AdjustedMovement {
    /// The movement as stored, enriched with display names.
    pub movement: MovementWithContext,
    /// The product's stock after the adjustment.
    pub stock_after: i64,
    /// The delta that was applied to reach it.
    pub delta_applied: i64,
}

/// A movement removed by the ledger, with the resulting stock level.
#[derive(Debug)]
pub struct RemovedMovement {
    /// The movement that was removed.
    pub movement: Movement,
    /// The product's stock after the reversal.
    pub stock_after: i64,
    /// The delta that was applied to reach it.
    pub delta_applied: i64,
}

/// The stock ledger service.
pub struct StockLedger<'a> {
    pool: &'a PgPool,
}

impl<'a> StockLedger<'a> {
    /// Create a new ledger over the given pool.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Apply a signed delta to a product's stock within a transaction.
    ///
    /// Returns the new stock value. When the guarded update touches no row,
    /// a follow-up read distinguishes a missing product from an adjustment
    /// the non-negativity guard rejected.
    async fn apply_adjustment(
        conn: &mut PgConnection,
        product_id: ProductId,
        delta: i64,
    ) -> Result<i64, LedgerError> {
        match db::products::adjust_stock(&mut *conn, product_id, delta).await? {
            Some(stock) => Ok(stock),
            None => match db::products::get_stock(&mut *conn, product_id).await? {
                Some(available) => Err(LedgerError::InsufficientStock {
                    product_id,
                    available,
                    requested: -delta,
                }),
                None => Err(LedgerError::ProductNotFound(product_id)),
            },
        }
    }

    /// Record a new movement and apply its delta to the product's stock.
    ///
    /// The adjustment and the insert happen in one transaction: if the
    /// adjustment is rejected, no movement row is created.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad payloads, `ProductNotFound` if the
    /// product is absent, `InsufficientStock` if an outbound movement
    /// exceeds the available stock, and `Store` for database failures.
    pub async fn create_movement(
        &self,
        input: &MovementInput,
        recorded_by: StaffId,
    ) -> Result<AdjustedMovement, LedgerError> {
        input.validate()?;
        let delta = input.signed_delta();

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;
        let stock_after = Self::apply_adjustment(&mut tx, input.product_id, delta).await?;
        let movement = db::movements::insert_movement(&mut *tx, input, recorded_by).await?;
        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            movement_id = %movement.id,
            product_id = %input.product_id,
            kind = %input.kind,
            delta,
            stock_after,
            "movement recorded"
        );

        let movement = self.enrich(movement.id).await?;
        Ok(AdjustedMovement {
            movement,
            stock_after,
            delta_applied: delta,
        })
    }

    /// Replace a movement's fields and reconcile the product's stock.
    ///
    /// When the product is unchanged the net delta is applied as a single
    /// adjustment; when the movement is moved to another product, the old
    /// product is reversed and the new one adjusted, still in one
    /// transaction. Either way a rejected adjustment rolls everything back.
    ///
    /// # Errors
    ///
    /// Returns `MovementNotFound` if the movement is absent, plus everything
    /// [`Self::create_movement`] can return.
    pub async fn update_movement(
        &self,
        id: MovementId,
        input: &MovementInput,
    ) -> Result<AdjustedMovement, LedgerError> {
        input.validate()?;

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;
        let existing = db::movements::get_movement(&mut *tx, id)
            .await?
            .ok_or(LedgerError::MovementNotFound(id))?;

        let (stock_after, delta_applied) = if existing.product_id == input.product_id {
            let delta = net_delta(
                (existing.kind, existing.quantity),
                (input.kind, input.quantity),
            );
            let stock = Self::apply_adjustment(&mut tx, input.product_id, delta).await?;
            (stock, delta)
        } else {
            Self::apply_adjustment(&mut tx, existing.product_id, -existing.signed_delta()).await?;
            let delta = input.signed_delta();
            let stock = Self::apply_adjustment(&mut tx, input.product_id, delta).await?;
            (stock, delta)
        };

        let updated = db::movements::update_movement_row(&mut *tx, id, input)
            .await?
            .ok_or(LedgerError::MovementNotFound(id))?;
        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            movement_id = %updated.id,
            product_id = %input.product_id,
            kind = %input.kind,
            delta_applied,
            stock_after,
            "movement updated"
        );

        let movement = self.enrich(updated.id).await?;
        Ok(AdjustedMovement {
            movement,
            stock_after,
            delta_applied,
        })
    }

    /// Remove a movement and reverse its effect on the product's stock.
    ///
    /// # Errors
    ///
    /// Returns `MovementNotFound` if the movement is absent,
    /// `InsufficientStock` if reversing an arrival would drive stock
    /// negative, and `Store` for database failures.
    pub async fn delete_movement(&self, id: MovementId) -> Result<RemovedMovement, LedgerError> {
        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;
        let existing = db::movements::get_movement(&mut *tx, id)
            .await?
            .ok_or(LedgerError::MovementNotFound(id))?;

        let delta = -existing.signed_delta();
        let stock_after = Self::apply_adjustment(&mut tx, existing.product_id, delta).await?;

        // A concurrent delete loses the race here and the rollback undoes
        // its double reversal.
        if !db::movements::delete_movement_row(&mut *tx, id).await? {
            return Err(LedgerError::MovementNotFound(id));
        }
        tx.commit().await.map_err(RepositoryError::from)?;

        tracing::info!(
            movement_id = %existing.id,
            product_id = %existing.product_id,
            delta,
            stock_after,
            "movement removed"
        );

        Ok(RemovedMovement {
            movement: existing,
            stock_after,
            delta_applied: delta,
        })
    }

    async fn enrich(&self, id: MovementId) -> Result<MovementWithContext, LedgerError> {
        db::movements::get_movement_with_context(self.pool, id)
            .await?
            .ok_or(LedgerError::MovementNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fold a sequence of (kind, quantity) contributions over a starting
    /// stock, rejecting any step that would go negative - the pure shape of
    /// what the guarded adjustment does per step.
    fn checked_fold(start: i64, steps: &[(MovementKind, i64)]) -> (i64, Vec<bool>) {
        let mut stock = start;
        let mut accepted = Vec::new();
        for (kind, quantity) in steps {
            let next = stock + kind.signed_delta(*quantity);
            if next >= 0 {
                stock = next;
                accepted.push(true);
            } else {
                accepted.push(false);
            }
        }
        (stock, accepted)
    }

    #[test]
    fn test_arrival_increases_by_exactly_quantity() {
        let (stock, accepted) = checked_fold(3, &[(MovementKind::Arrival, 9)]);
        assert_eq!(stock, 12);
        assert_eq!(accepted, vec![true]);
    }

    #[test]
    fn test_outbound_decreases_or_rejects() {
        let (stock, accepted) = checked_fold(10, &[(MovementKind::Pickup, 4)]);
        assert_eq!(stock, 6);
        assert_eq!(accepted, vec![true]);

        let (stock, accepted) = checked_fold(3, &[(MovementKind::Delivery, 4)]);
        assert_eq!(stock, 3, "rejected adjustment must leave stock unchanged");
        assert_eq!(accepted, vec![false]);
    }

    #[test]
    fn test_deletion_is_exact_inverse_of_creation() {
        for kind in [
            MovementKind::Arrival,
            MovementKind::Pickup,
            MovementKind::Delivery,
        ] {
            let start = 20;
            let after_create = start + kind.signed_delta(7);
            let after_delete = after_create + -kind.signed_delta(7);
            assert_eq!(after_delete, start);
        }
    }

    #[test]
    fn test_update_composes_to_delete_then_create() {
        let start = 50;
        let old = (MovementKind::Arrival, 5);
        let new = (MovementKind::Delivery, 12);

        let after_create = start + old.0.signed_delta(old.1);
        let via_net = after_create + net_delta(old, new);
        let via_delete_create =
            after_create + -old.0.signed_delta(old.1) + new.0.signed_delta(new.1);

        assert_eq!(via_net, via_delete_create);
        assert_eq!(via_net, start + new.0.signed_delta(new.1));
    }

    #[test]
    fn test_net_delta_of_identical_contribution_is_zero() {
        assert_eq!(
            net_delta((MovementKind::Pickup, 8), (MovementKind::Pickup, 8)),
            0
        );
    }

    #[test]
    fn test_stock_ten_scenario() {
        // start at 10: +5 arrival -> 15; delivery 20 rejected -> 15;
        // delivery 15 -> 0; deleting that delivery -> 15.
        let (stock, accepted) = checked_fold(
            10,
            &[
                (MovementKind::Arrival, 5),
                (MovementKind::Delivery, 20),
                (MovementKind::Delivery, 15),
            ],
        );
        assert_eq!(accepted, vec![true, false, true]);
        assert_eq!(stock, 0);

        // reversal of the accepted delivery
        let restored = stock + -MovementKind::Delivery.signed_delta(15);
        assert_eq!(restored, 15);
    }
}
