//! Mock payment gateway for testing.
//!
//! Supports scripted statuses, error injection for either operation, and
//! call counting, so tests can simulate retryable failures, duplicate status
//! queries, and slow-settling payments.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{
    CreateTransactionRequest, GatewayError, GatewayPaymentStatus, GatewayTransaction,
    PaymentGateway,
};

/// Mock payment gateway.
///
/// # Example
///
/// ```ignore
/// let gateway = MockPaymentGateway::new();
/// gateway.set_status("tx_mock_1", GatewayPaymentStatus::Succeeded);
/// gateway.fail_next_create(GatewayError::timeout("deadline exceeded"));
/// ```
#[derive(Default)]
pub struct MockPaymentGateway {
    inner: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    /// Scripted status per transaction id.
    statuses: HashMap<String, GatewayPaymentStatus>,

    /// Error to return from the next create_transaction call.
    next_create_error: Option<GatewayError>,

    /// Error to return from the next get_status call.
    next_status_error: Option<GatewayError>,

    create_calls: u32,
    status_calls: u32,
    sequence: u32,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the status reported for a transaction.
    pub fn set_status(&self, transaction_id: &str, status: GatewayPaymentStatus) {
        self.inner
            .lock()
            .unwrap()
            .statuses
            .insert(transaction_id.to_string(), status);
    }

    /// Make the next create_transaction call fail with `error`.
    pub fn fail_next_create(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_create_error = Some(error);
    }

    /// Make the next get_status call fail with `error`.
    pub fn fail_next_status(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_status_error = Some(error);
    }

    /// Number of create_transaction calls made.
    pub fn create_calls(&self) -> u32 {
        self.inner.lock().unwrap().create_calls
    }

    /// Number of get_status calls made.
    pub fn status_calls(&self) -> u32 {
        self.inner.lock().unwrap().status_calls
    }

    /// The transaction id of the most recently created transaction.
    pub fn last_transaction_id(&self) -> Option<String> {
        let state = self.inner.lock().unwrap();
        if state.sequence == 0 {
            None
        } else {
            Some(format!("tx_mock_{}", state.sequence))
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_transaction(
        &self,
        _request: CreateTransactionRequest,
    ) -> Result<GatewayTransaction, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.create_calls += 1;

        if let Some(error) = state.next_create_error.take() {
            return Err(error);
        }

        state.sequence += 1;
        let transaction_id = format!("tx_mock_{}", state.sequence);
        let client_secret = format!("{}_secret", transaction_id);

        // New transactions start in-flight unless a test scripts otherwise.
        state
            .statuses
            .entry(transaction_id.clone())
            .or_insert(GatewayPaymentStatus::Processing);

        Ok(GatewayTransaction {
            transaction_id,
            client_secret,
        })
    }

    async fn get_status(&self, transaction_id: &str) -> Result<GatewayPaymentStatus, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.status_calls += 1;

        if let Some(error) = state.next_status_error.take() {
            return Err(error);
        }

        state
            .statuses
            .get(transaction_id)
            .copied()
            .ok_or_else(|| GatewayError::not_found(transaction_id))
    }
}
