//! In-memory implementation of the entitlement store.
//!
//! Backs tests and local development. All operations take the single mutex,
//! which is exactly what makes `create_if_absent` and `transition` atomic:
//! the existence check and the insert (or the status compare and the write)
//! happen under one critical section. The mutex is never held across an
//! await point.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{
    DomainError, ErrorCode, MaterialId, PurchaseId, Timestamp, UserId,
};
use crate::domain::purchase::{Purchase, PurchaseStatus};
use crate::ports::{ConflictKind, CreateOutcome, EntitlementStore, Transition};

/// In-memory entitlement store.
#[derive(Default)]
pub struct InMemoryEntitlementStore {
    purchases: Mutex<HashMap<PurchaseId, Purchase>>,
}

impl InMemoryEntitlementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntitlementStore for InMemoryEntitlementStore {
    async fn create_if_absent(&self, purchase: Purchase) -> Result<CreateOutcome, DomainError> {
        let mut purchases = self.purchases.lock().unwrap();

        let blocking = purchases
            .values()
            .filter(|p| p.user_id == purchase.user_id && p.material_id == purchase.material_id)
            .find(|p| p.is_active());

        if let Some(existing) = blocking {
            let kind = if existing.grants_ownership() {
                ConflictKind::CompletedExists
            } else {
                ConflictKind::ActiveExists
            };
            return Ok(CreateOutcome::Conflict(kind));
        }

        purchases.insert(purchase.id, purchase.clone());
        Ok(CreateOutcome::Created(purchase))
    }

    async fn mark_created(
        &self,
        id: PurchaseId,
        transaction_id: &str,
        client_secret: &str,
    ) -> Result<Purchase, DomainError> {
        let mut purchases = self.purchases.lock().unwrap();

        let purchase = purchases.get_mut(&id).ok_or_else(|| {
            DomainError::new(ErrorCode::PurchaseNotFound, format!("Purchase not found: {}", id))
        })?;

        purchase
            .attach_transaction(transaction_id, client_secret, Timestamp::now())
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;

        Ok(purchase.clone())
    }

    async fn transition(
        &self,
        id: PurchaseId,
        expected: PurchaseStatus,
        next: PurchaseStatus,
    ) -> Result<Transition, DomainError> {
        let mut purchases = self.purchases.lock().unwrap();

        let purchase = purchases.get_mut(&id).ok_or_else(|| {
            DomainError::new(ErrorCode::PurchaseNotFound, format!("Purchase not found: {}", id))
        })?;

        if purchase.status != expected {
            return Ok(Transition::Stale(purchase.clone()));
        }

        purchase
            .transition(next, Timestamp::now())
            .map_err(|e| DomainError::new(ErrorCode::InvalidStateTransition, e.to_string()))?;

        Ok(Transition::Applied(purchase.clone()))
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Purchase>, DomainError> {
        let purchases = self.purchases.lock().unwrap();
        Ok(purchases
            .values()
            .find(|p| p.transaction_id.as_deref() == Some(transaction_id))
            .cloned())
    }

    async fn find_by_id(&self, id: PurchaseId) -> Result<Option<Purchase>, DomainError> {
        let purchases = self.purchases.lock().unwrap();
        Ok(purchases.get(&id).cloned())
    }

    async fn is_owned(
        &self,
        user_id: UserId,
        material_id: MaterialId,
    ) -> Result<bool, DomainError> {
        let purchases = self.purchases.lock().unwrap();
        Ok(purchases
            .values()
            .any(|p| p.user_id == user_id && p.material_id == material_id && p.grants_ownership()))
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Purchase>, DomainError> {
        let purchases = self.purchases.lock().unwrap();
        let mut result: Vec<Purchase> = purchases
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list_all(&self) -> Result<Vec<Purchase>, DomainError> {
        let purchases = self.purchases.lock().unwrap();
        let mut result: Vec<Purchase> = purchases.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}
