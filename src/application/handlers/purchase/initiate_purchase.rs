//! InitiatePurchaseHandler - starts a purchase and creates the gateway
//! transaction.
//!
//! Ordering is the whole point here. The (user, material) pair is reserved in
//! the entitlement store *before* the gateway is contacted, as a single
//! atomic create-or-conflict, so two racing initiations can never both reach
//! the gateway. No store lock is held across the gateway call; if the gateway
//! fails or times out, the reservation is released by marking it `Failed`
//! (the row stays behind for audit and does not block a retry).

use std::sync::Arc;

use crate::domain::foundation::{MaterialId, PurchaseId, Timestamp, UserId};
use crate::domain::purchase::{Purchase, PurchaseError, PurchaseStatus};
use crate::ports::{
    ConflictKind, CreateOutcome, CreateTransactionRequest, EntitlementStore, MaterialCatalog,
    PaymentGateway, UserDirectory,
};

/// Command to start a purchase.
#[derive(Debug, Clone)]
pub struct InitiatePurchaseCommand {
    pub user_id: UserId,
    pub material_id: MaterialId,
}

/// Handler for purchase initiation.
pub struct InitiatePurchaseHandler {
    store: Arc<dyn EntitlementStore>,
    catalog: Arc<dyn MaterialCatalog>,
    directory: Arc<dyn UserDirectory>,
    gateway: Arc<dyn PaymentGateway>,
}

impl InitiatePurchaseHandler {
    pub fn new(
        store: Arc<dyn EntitlementStore>,
        catalog: Arc<dyn MaterialCatalog>,
        directory: Arc<dyn UserDirectory>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            store,
            catalog,
            directory,
            gateway,
        }
    }

    pub async fn handle(&self, cmd: InitiatePurchaseCommand) -> Result<Purchase, PurchaseError> {
        // 1. Preconditions: both referenced entities must exist.
        self.directory
            .find(cmd.user_id)
            .await?
            .ok_or_else(|| PurchaseError::user_not_found(cmd.user_id))?;

        let material = self
            .catalog
            .find(cmd.material_id)
            .await?
            .ok_or_else(|| PurchaseError::material_not_found(cmd.material_id))?;

        // 2. Reserve the pair atomically. The price snapshot is taken here;
        //    later catalog repricing does not affect this purchase.
        let placeholder = Purchase::initiate(
            PurchaseId::new(),
            cmd.user_id,
            cmd.material_id,
            material.price.clone(),
            Timestamp::now(),
        );

        let reserved = match self.store.create_if_absent(placeholder).await? {
            CreateOutcome::Created(purchase) => purchase,
            CreateOutcome::Conflict(ConflictKind::CompletedExists) => {
                return Err(PurchaseError::already_owned(cmd.user_id, cmd.material_id));
            }
            CreateOutcome::Conflict(ConflictKind::ActiveExists) => {
                return Err(PurchaseError::already_pending(cmd.user_id, cmd.material_id));
            }
        };

        // 3. Create the gateway transaction. The reservation exists but no
        //    lock is held while this call is in flight.
        let request = CreateTransactionRequest {
            amount: reserved.price_charged.clone(),
            description: format!("Purchase of {}", material.title),
        };

        match self.gateway.create_transaction(request).await {
            Ok(tx) => {
                let purchase = self
                    .store
                    .mark_created(reserved.id, &tx.transaction_id, &tx.client_secret)
                    .await?;
                tracing::info!(
                    purchase_id = %purchase.id,
                    transaction_id = %tx.transaction_id,
                    "purchase initiated"
                );
                Ok(purchase)
            }
            Err(gateway_err) => {
                // Release the reservation so the user can retry. The row is
                // kept as Failed with no external id.
                if let Err(release_err) = self
                    .store
                    .transition(reserved.id, PurchaseStatus::Pending, PurchaseStatus::Failed)
                    .await
                {
                    tracing::error!(
                        purchase_id = %reserved.id,
                        error = %release_err,
                        "failed to release reservation after gateway error"
                    );
                }
                tracing::warn!(
                    purchase_id = %reserved.id,
                    retryable = gateway_err.retryable,
                    "gateway rejected transaction creation: {}",
                    gateway_err
                );
                Err(PurchaseError::gateway(
                    gateway_err.message,
                    gateway_err.retryable,
                ))
            }
        }
    }
}
