//! Purchase aggregate.
//!
//! The central record of one user's attempt to acquire one material. Created
//! as a `Pending` placeholder that reserves the (user, material) pair, then
//! promoted once the gateway transaction exists, then reconciled to its final
//! outcome. Purchases are never deleted; failed attempts stay behind as an
//! audit trail.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    MaterialId, Money, PurchaseId, StateMachine, Timestamp, UserId,
};

use super::{PurchaseError, PurchaseStatus};

/// A purchase record.
///
/// `price_charged` is snapshotted from the catalog at initiation time and
/// never changes afterwards, even if the material is repriced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub material_id: MaterialId,
    pub price_charged: Money,
    pub status: PurchaseStatus,

    /// Gateway transaction id; `None` until the gateway transaction exists.
    pub transaction_id: Option<String>,

    /// Gateway client secret the buyer uses to complete payment.
    pub client_secret: Option<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Purchase {
    /// Creates the `Pending` placeholder that reserves the pair before any
    /// gateway call is made.
    pub fn initiate(
        id: PurchaseId,
        user_id: UserId,
        material_id: MaterialId,
        price_charged: Money,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            material_id,
            price_charged,
            status: PurchaseStatus::Pending,
            transaction_id: None,
            client_secret: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attaches the gateway transaction and promotes the placeholder to
    /// `Created`.
    pub fn attach_transaction(
        &mut self,
        transaction_id: impl Into<String>,
        client_secret: impl Into<String>,
        now: Timestamp,
    ) -> Result<(), PurchaseError> {
        self.transition(PurchaseStatus::Created, now)?;
        self.transaction_id = Some(transaction_id.into());
        self.client_secret = Some(client_secret.into());
        Ok(())
    }

    /// Moves the purchase to a new status, enforcing the one-directional
    /// transition table. A rejected transition is an internal consistency
    /// fault, not a user error.
    pub fn transition(
        &mut self,
        next: PurchaseStatus,
        now: Timestamp,
    ) -> Result<(), PurchaseError> {
        self.status = self.status.transition_to(next).map_err(|_| {
            PurchaseError::inconsistent_state(self.status.as_str(), next.as_str())
        })?;
        self.updated_at = now;
        Ok(())
    }

    /// Returns true if this purchase blocks a new attempt for the same pair.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true iff this purchase grants ownership of the material.
    pub fn grants_ownership(&self) -> bool {
        self.status.grants_ownership()
    }

    /// Returns true if the purchase has reached a state `Confirm` no longer
    /// needs to reconcile.
    pub fn is_settled(&self) -> bool {
        matches!(
            self.status,
            PurchaseStatus::Completed | PurchaseStatus::Failed | PurchaseStatus::Refunded
        )
    }
}
