//! Purchase-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UserNotFound / MaterialNotFound / TransactionNotFound | 404 |
//! | AlreadyOwned / AlreadyPending | 400 |
//! | Gateway | 502 |
//! | PaymentFailed | 402 |
//! | InconsistentState | 500 |
//! | Store | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, MaterialId, UserId};

/// Errors produced by the purchase orchestration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    /// The initiating user does not exist.
    UserNotFound(UserId),

    /// The requested material does not exist in the catalog.
    MaterialNotFound(MaterialId),

    /// No purchase is known for this gateway transaction id.
    TransactionNotFound(String),

    /// The user already owns this material (a completed purchase exists).
    AlreadyOwned { user_id: UserId, material_id: MaterialId },

    /// A purchase for this pair is already underway.
    AlreadyPending { user_id: UserId, material_id: MaterialId },

    /// The payment gateway call failed.
    Gateway { message: String, retryable: bool },

    /// The gateway reported the payment as failed or canceled.
    PaymentFailed { transaction_id: String },

    /// A status write would have moved the purchase backward. Indicates a bug
    /// or a misbehaving gateway; never expected in normal operation.
    InconsistentState { current: String, attempted: String },

    /// The entitlement store failed.
    Store(String),
}

impl PurchaseError {
    pub fn user_not_found(user_id: UserId) -> Self {
        PurchaseError::UserNotFound(user_id)
    }

    pub fn material_not_found(material_id: MaterialId) -> Self {
        PurchaseError::MaterialNotFound(material_id)
    }

    pub fn transaction_not_found(transaction_id: impl Into<String>) -> Self {
        PurchaseError::TransactionNotFound(transaction_id.into())
    }

    pub fn already_owned(user_id: UserId, material_id: MaterialId) -> Self {
        PurchaseError::AlreadyOwned { user_id, material_id }
    }

    pub fn already_pending(user_id: UserId, material_id: MaterialId) -> Self {
        PurchaseError::AlreadyPending { user_id, material_id }
    }

    pub fn gateway(message: impl Into<String>, retryable: bool) -> Self {
        PurchaseError::Gateway {
            message: message.into(),
            retryable,
        }
    }

    pub fn payment_failed(transaction_id: impl Into<String>) -> Self {
        PurchaseError::PaymentFailed {
            transaction_id: transaction_id.into(),
        }
    }

    pub fn inconsistent_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        PurchaseError::InconsistentState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        PurchaseError::Store(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PurchaseError::UserNotFound(_) => ErrorCode::UserNotFound,
            PurchaseError::MaterialNotFound(_) => ErrorCode::MaterialNotFound,
            PurchaseError::TransactionNotFound(_) => ErrorCode::PurchaseNotFound,
            PurchaseError::AlreadyOwned { .. } | PurchaseError::AlreadyPending { .. } => {
                ErrorCode::PurchaseConflict
            }
            PurchaseError::Gateway { .. } => ErrorCode::GatewayError,
            PurchaseError::PaymentFailed { .. } => ErrorCode::PaymentFailed,
            PurchaseError::InconsistentState { .. } => ErrorCode::InvalidStateTransition,
            PurchaseError::Store(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns true if the caller may safely retry the failed operation.
    ///
    /// Only transient gateway failures qualify; conflicts and payment
    /// failures must be resolved by the user, not replayed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PurchaseError::Gateway { retryable: true, .. })
    }
}

impl std::fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseError::UserNotFound(id) => write!(f, "User not found: {}", id),
            PurchaseError::MaterialNotFound(id) => write!(f, "Material not found: {}", id),
            PurchaseError::TransactionNotFound(tx) => {
                write!(f, "No purchase found for transaction {}", tx)
            }
            PurchaseError::AlreadyOwned { material_id, .. } => {
                write!(f, "Material {} already owned", material_id)
            }
            PurchaseError::AlreadyPending { material_id, .. } => {
                write!(f, "A purchase of material {} is already in progress", material_id)
            }
            PurchaseError::Gateway { message, retryable } => {
                write!(
                    f,
                    "Payment gateway error ({}): {}",
                    if *retryable { "retryable" } else { "fatal" },
                    message
                )
            }
            PurchaseError::PaymentFailed { transaction_id } => {
                write!(f, "Payment failed for transaction {}", transaction_id)
            }
            PurchaseError::InconsistentState { current, attempted } => {
                write!(
                    f,
                    "Inconsistent purchase state: cannot move from {} to {}",
                    current, attempted
                )
            }
            PurchaseError::Store(message) => write!(f, "Entitlement store error: {}", message),
        }
    }
}

impl std::error::Error for PurchaseError {}

impl From<DomainError> for PurchaseError {
    fn from(err: DomainError) -> Self {
        PurchaseError::Store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_taxonomy() {
        let user = UserId::new();
        let material = MaterialId::new();

        assert_eq!(
            PurchaseError::already_owned(user, material).code(),
            ErrorCode::PurchaseConflict
        );
        assert_eq!(
            PurchaseError::payment_failed("tx_1").code(),
            ErrorCode::PaymentFailed
        );
        assert_eq!(
            PurchaseError::gateway("boom", true).code(),
            ErrorCode::GatewayError
        );
        assert_eq!(
            PurchaseError::inconsistent_state("completed", "created").code(),
            ErrorCode::InvalidStateTransition
        );
    }

    #[test]
    fn only_transient_gateway_errors_are_retryable() {
        assert!(PurchaseError::gateway("timeout", true).is_retryable());
        assert!(!PurchaseError::gateway("bad amount", false).is_retryable());
        assert!(!PurchaseError::payment_failed("tx_1").is_retryable());
        assert!(!PurchaseError::already_pending(UserId::new(), MaterialId::new()).is_retryable());
    }

    #[test]
    fn display_includes_transaction_id() {
        let err = PurchaseError::payment_failed("tx_42");
        assert!(err.to_string().contains("tx_42"));
    }

    #[test]
    fn domain_error_converts_to_store_error() {
        let err: PurchaseError = DomainError::database("connection reset").into();
        assert!(matches!(err, PurchaseError::Store(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
