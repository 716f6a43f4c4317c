//! Query handlers for purchase history and ownership checks.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, MaterialId, UserId};
use crate::domain::purchase::Purchase;
use crate::ports::EntitlementStore;

/// Returns one user's purchase history.
pub struct ListUserPurchasesHandler {
    store: Arc<dyn EntitlementStore>,
}

impl ListUserPurchasesHandler {
    pub fn new(store: Arc<dyn EntitlementStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<Vec<Purchase>, DomainError> {
        self.store.list_for_user(user_id).await
    }
}

/// Returns every purchase in the system. Admin listing.
pub struct ListAllPurchasesHandler {
    store: Arc<dyn EntitlementStore>,
}

impl ListAllPurchasesHandler {
    pub fn new(store: Arc<dyn EntitlementStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<Vec<Purchase>, DomainError> {
        self.store.list_all().await
    }
}

/// Answers "does this user own this material" with a live store read.
pub struct CheckOwnershipHandler {
    store: Arc<dyn EntitlementStore>,
}

impl CheckOwnershipHandler {
    pub fn new(store: Arc<dyn EntitlementStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        user_id: UserId,
        material_id: MaterialId,
    ) -> Result<bool, DomainError> {
        self.store.is_owned(user_id, material_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryEntitlementStore;
    use crate::domain::foundation::{Money, PurchaseId, Timestamp};
    use crate::domain::purchase::PurchaseStatus;
    use crate::ports::CreateOutcome;
    use rust_decimal::Decimal;

    async fn seed(store: &InMemoryEntitlementStore, user: UserId, tx: &str) -> Purchase {
        let placeholder = Purchase::initiate(
            PurchaseId::new(),
            user,
            MaterialId::new(),
            Money::new(Decimal::from(10), "usd").unwrap(),
            Timestamp::now(),
        );
        let purchase = match store.create_if_absent(placeholder).await.unwrap() {
            CreateOutcome::Created(p) => p,
            other => panic!("unexpected outcome: {:?}", other),
        };
        store.mark_created(purchase.id, tx, "secret").await.unwrap()
    }

    #[tokio::test]
    async fn list_for_user_returns_only_their_purchases() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let alice = UserId::new();
        let bob = UserId::new();
        seed(&store, alice, "tx_a").await;
        seed(&store, bob, "tx_b").await;

        let purchases = ListUserPurchasesHandler::new(store.clone())
            .handle(alice)
            .await
            .unwrap();

        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].user_id, alice);
    }

    #[tokio::test]
    async fn list_all_returns_everything() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        seed(&store, UserId::new(), "tx_a").await;
        seed(&store, UserId::new(), "tx_b").await;

        let purchases = ListAllPurchasesHandler::new(store).handle().await.unwrap();
        assert_eq!(purchases.len(), 2);
    }

    #[tokio::test]
    async fn ownership_requires_a_completed_purchase() {
        let store = Arc::new(InMemoryEntitlementStore::new());
        let user = UserId::new();
        let purchase = seed(&store, user, "tx_a").await;
        let handler = CheckOwnershipHandler::new(store.clone());

        assert!(!handler.handle(user, purchase.material_id).await.unwrap());

        store
            .transition(purchase.id, PurchaseStatus::Created, PurchaseStatus::Completed)
            .await
            .unwrap();

        assert!(handler.handle(user, purchase.material_id).await.unwrap());
    }
}
