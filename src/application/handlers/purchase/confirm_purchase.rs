//! ConfirmPurchaseHandler - idempotent payment reconciliation.
//!
//! Gateways deliver confirmation more than once, out of order, and
//! concurrently with polling. The handler is therefore built around two
//! rules: settled purchases short-circuit without touching the gateway, and
//! every status write is a compare-and-swap. A caller that loses the swap
//! re-reads and returns whatever the winner wrote instead of erroring.

use std::sync::Arc;

use crate::domain::foundation::ErrorCode;
use crate::domain::purchase::{Purchase, PurchaseError, PurchaseStatus};
use crate::ports::{EntitlementStore, GatewayPaymentStatus, PaymentGateway, Transition};

/// Command to reconcile a purchase against the gateway.
#[derive(Debug, Clone)]
pub struct ConfirmPurchaseCommand {
    pub transaction_id: String,
}

/// Handler for payment confirmation.
pub struct ConfirmPurchaseHandler {
    store: Arc<dyn EntitlementStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl ConfirmPurchaseHandler {
    pub fn new(store: Arc<dyn EntitlementStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { store, gateway }
    }

    /// Reconcile the purchase behind `transaction_id`.
    ///
    /// Returns the purchase in its post-reconciliation state. A purchase
    /// still `Processing` is a success, not an error; the caller retries
    /// later. `PaymentFailed` is returned only when this call is the one
    /// that discovers the failure.
    pub async fn handle(&self, cmd: ConfirmPurchaseCommand) -> Result<Purchase, PurchaseError> {
        let purchase = self
            .store
            .find_by_transaction_id(&cmd.transaction_id)
            .await?
            .ok_or_else(|| PurchaseError::transaction_not_found(&cmd.transaction_id))?;

        // Terminal states are returned as-is: no gateway call, no side
        // effects, no error. This is what makes repeated delivery safe.
        if purchase.is_settled() {
            return Ok(purchase);
        }

        let gateway_status = self
            .gateway
            .get_status(&cmd.transaction_id)
            .await
            .map_err(|e| PurchaseError::gateway(e.message, e.retryable))?;

        let next = match gateway_status {
            GatewayPaymentStatus::Succeeded => PurchaseStatus::Completed,
            GatewayPaymentStatus::Processing => PurchaseStatus::Processing,
            GatewayPaymentStatus::Failed | GatewayPaymentStatus::Canceled => PurchaseStatus::Failed,
        };

        let expected = purchase.status;
        let outcome = self
            .store
            .transition(purchase.id, expected, next)
            .await
            .map_err(|e| {
                if e.code == ErrorCode::InvalidStateTransition {
                    tracing::error!(
                        purchase_id = %purchase.id,
                        current = expected.as_str(),
                        attempted = next.as_str(),
                        "gateway reported a status that would move the purchase backward"
                    );
                    PurchaseError::inconsistent_state(expected.as_str(), next.as_str())
                } else {
                    PurchaseError::from(e)
                }
            })?;

        match outcome {
            Transition::Applied(updated) => {
                if updated.status == PurchaseStatus::Failed {
                    tracing::info!(
                        purchase_id = %updated.id,
                        transaction_id = %cmd.transaction_id,
                        "payment failed"
                    );
                    return Err(PurchaseError::payment_failed(cmd.transaction_id));
                }
                Ok(updated)
            }
            // Lost the race: a concurrent confirmation already moved the
            // purchase. Its state is the answer.
            Transition::Stale(current) => Ok(current),
        }
    }
}
