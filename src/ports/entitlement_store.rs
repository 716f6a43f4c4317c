//! Entitlement store port.
//!
//! Durable record of purchase attempts and completed ownerships. The store is
//! the only contended resource in the system, so its contract is explicitly
//! about atomicity:
//!
//! - `create_if_absent` is a single atomic step: the check for an existing
//!   active purchase and the insertion of the placeholder either both happen
//!   or neither does. Two concurrent initiations for the same pair cannot
//!   both succeed.
//! - `transition` is a compare-and-swap on the current status. Losing the
//!   race is not an error; the caller receives the winning row and resolves
//!   idempotently.
//! - `is_owned` is a live read; implementations must not cache it.
//!
//! Purchases are never deleted.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MaterialId, PurchaseId, UserId};
use crate::domain::purchase::{Purchase, PurchaseStatus};

/// Repository port for purchase records.
#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Atomically insert `purchase` unless an active purchase already exists
    /// for its (user, material) pair.
    ///
    /// The conflict outcome distinguishes a completed purchase from a merely
    /// in-flight one so the orchestrator can produce the right error.
    async fn create_if_absent(&self, purchase: Purchase) -> Result<CreateOutcome, DomainError>;

    /// Promote a `Pending` placeholder to `Created`, attaching the gateway
    /// transaction id and client secret.
    ///
    /// Fails with `InvalidStateTransition` if the purchase is no longer
    /// `Pending`.
    async fn mark_created(
        &self,
        id: PurchaseId,
        transaction_id: &str,
        client_secret: &str,
    ) -> Result<Purchase, DomainError>;

    /// Compare-and-swap status transition.
    ///
    /// Applies `next` only if the stored status still equals `expected`;
    /// otherwise returns the current row unchanged. Invalid (backward)
    /// transitions fail with `InvalidStateTransition`.
    async fn transition(
        &self,
        id: PurchaseId,
        expected: PurchaseStatus,
        next: PurchaseStatus,
    ) -> Result<Transition, DomainError>;

    /// Find a purchase by its gateway transaction id.
    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Purchase>, DomainError>;

    /// Find a purchase by id.
    async fn find_by_id(&self, id: PurchaseId) -> Result<Option<Purchase>, DomainError>;

    /// Live ownership check: true iff a `Completed` purchase exists for the
    /// pair.
    async fn is_owned(&self, user_id: UserId, material_id: MaterialId)
        -> Result<bool, DomainError>;

    /// All purchases of one user, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Purchase>, DomainError>;

    /// All purchases in the store, newest first.
    async fn list_all(&self) -> Result<Vec<Purchase>, DomainError>;
}

/// Outcome of an atomic create.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// The purchase was inserted; the pair is now reserved.
    Created(Purchase),

    /// An active purchase already exists for the pair.
    Conflict(ConflictKind),
}

/// What kind of purchase blocked the insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A purchase in `Pending`/`Created`/`Processing` exists.
    ActiveExists,

    /// A `Completed` purchase exists: the user already owns the material.
    CompletedExists,
}

/// Outcome of a compare-and-swap transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The swap was applied; the updated row.
    Applied(Purchase),

    /// The stored status no longer matched `expected`; the current row.
    /// Not an error: the caller re-reads and resolves idempotently.
    Stale(Purchase),
}

impl Transition {
    /// The row after the operation, whether or not this caller won.
    pub fn into_purchase(self) -> Purchase {
        match self {
            Transition::Applied(p) | Transition::Stale(p) => p,
        }
    }

    /// Returns true if this caller's write won.
    pub fn was_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entitlement_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn EntitlementStore) {}
    }

    #[test]
    fn transition_unwraps_to_inner_purchase() {
        use crate::domain::foundation::{Money, PurchaseId, Timestamp};
        use rust_decimal::Decimal;

        let purchase = Purchase::initiate(
            PurchaseId::new(),
            UserId::new(),
            MaterialId::new(),
            Money::new(Decimal::from(10), "usd").unwrap(),
            Timestamp::now(),
        );

        let applied = Transition::Applied(purchase.clone());
        assert!(applied.was_applied());
        assert_eq!(applied.into_purchase(), purchase);

        let stale = Transition::Stale(purchase.clone());
        assert!(!stale.was_applied());
        assert_eq!(stale.into_purchase(), purchase);
    }
}
