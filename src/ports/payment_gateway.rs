//! Payment gateway port.
//!
//! Wraps the remote payment processor behind exactly two operations. Both are
//! slow, blocking network calls with a bounded timeout, and neither is assumed
//! to be idempotent on the gateway's side: the orchestrator's own stored
//! status is what protects against duplicate side effects on retry.
//!
//! # Design
//!
//! - **Gateway agnostic**: any processor with a create/poll shape fits
//! - **Classified errors**: transient failures are marked retryable so the
//!   caller can distinguish "try again" from "give up"

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;

/// Port for the remote payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment transaction for the given amount.
    ///
    /// Returns the gateway's transaction id and the client secret the buyer
    /// needs to complete payment directly with the gateway.
    async fn create_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<GatewayTransaction, GatewayError>;

    /// Fetch the current status of a transaction.
    async fn get_status(&self, transaction_id: &str) -> Result<GatewayPaymentStatus, GatewayError>;
}

/// Request to create a gateway transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Amount to charge (major units; adapters convert as needed).
    pub amount: Money,

    /// Human-readable description shown on the buyer's statement.
    pub description: String,
}

/// A transaction created at the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayTransaction {
    /// The gateway's opaque transaction id.
    pub transaction_id: String,

    /// Secret the buyer's client uses to complete payment.
    pub client_secret: String,
}

/// Status of a transaction as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayPaymentStatus {
    /// Payment collected successfully.
    Succeeded,

    /// Payment still in flight (including states waiting on buyer action).
    Processing,

    /// Payment definitively failed.
    Failed,

    /// Transaction canceled before completion.
    Canceled,
}

impl GatewayPaymentStatus {
    /// Returns true for the outcomes that end the transaction unsuccessfully.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            GatewayPaymentStatus::Failed | GatewayPaymentStatus::Canceled
        )
    }
}

/// Errors from gateway operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    /// Error category.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried by the caller.
    pub retryable: bool,
}

impl GatewayError {
    /// Create a new gateway error; retryability follows the code.
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network/connectivity error (retryable).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Network, message)
    }

    /// Create a request timeout error (retryable).
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Timeout, message)
    }

    /// Create an authentication error (fatal).
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Authentication, message)
    }

    /// Create an invalid request error (fatal).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidRequest, message)
    }

    /// Create a transaction-not-found error (fatal).
    pub fn not_found(transaction_id: &str) -> Self {
        Self::new(
            GatewayErrorCode::NotFound,
            format!("Transaction {} not found", transaction_id),
        )
    }

    /// Create a provider-side error (retryable: 5xx class).
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::Provider, message)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

/// Gateway error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorCode {
    /// Network connectivity issue.
    Network,

    /// Request exceeded the bounded timeout.
    Timeout,

    /// API authentication failed.
    Authentication,

    /// The request was rejected as invalid (bad amount, bad currency).
    InvalidRequest,

    /// The transaction does not exist at the gateway.
    NotFound,

    /// Gateway-side failure (5xx class).
    Provider,
}

impl GatewayErrorCode {
    /// Check if this error category is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::Network | GatewayErrorCode::Timeout | GatewayErrorCode::Provider
        )
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::Network => "network",
            GatewayErrorCode::Timeout => "timeout",
            GatewayErrorCode::Authentication => "authentication",
            GatewayErrorCode::InvalidRequest => "invalid_request",
            GatewayErrorCode::NotFound => "not_found",
            GatewayErrorCode::Provider => "provider",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn PaymentGateway) {}
    }

    #[test]
    fn transient_codes_are_retryable() {
        assert!(GatewayErrorCode::Network.is_retryable());
        assert!(GatewayErrorCode::Timeout.is_retryable());
        assert!(GatewayErrorCode::Provider.is_retryable());

        assert!(!GatewayErrorCode::Authentication.is_retryable());
        assert!(!GatewayErrorCode::InvalidRequest.is_retryable());
        assert!(!GatewayErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn constructors_set_retryability_from_code() {
        assert!(GatewayError::timeout("deadline exceeded").retryable);
        assert!(!GatewayError::invalid_request("negative amount").retryable);
    }

    #[test]
    fn failed_and_canceled_are_failures() {
        assert!(GatewayPaymentStatus::Failed.is_failure());
        assert!(GatewayPaymentStatus::Canceled.is_failure());
        assert!(!GatewayPaymentStatus::Succeeded.is_failure());
        assert!(!GatewayPaymentStatus::Processing.is_failure());
    }

    #[test]
    fn error_display_includes_code_and_message() {
        let err = GatewayError::network("connection refused");
        assert_eq!(err.to_string(), "network: connection refused");
    }
}
