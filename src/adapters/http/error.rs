//! HTTP error mapping.
//!
//! Converts domain and application errors into status codes and the JSON
//! error body `{ "error": ..., "code": ... }`.
//!
//! | Error | Status |
//! |-------|--------|
//! | NotFound (user/material/purchase/transaction) | 404 |
//! | AlreadyOwned / AlreadyPending | 400 |
//! | GatewayError | 502 |
//! | PaymentFailed | 402 |
//! | Unauthenticated | 401 |
//! | Forbidden | 403 |
//! | InconsistentState / Store / infrastructure | 500 |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::application::AccessError;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::purchase::PurchaseError;

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Unified error type for HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    Purchase(PurchaseError),
    Access(AccessError),
    Domain(DomainError),
}

impl From<PurchaseError> for ApiError {
    fn from(err: PurchaseError) -> Self {
        ApiError::Purchase(err)
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        ApiError::Access(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Purchase(err) => match err {
                PurchaseError::UserNotFound(_)
                | PurchaseError::MaterialNotFound(_)
                | PurchaseError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
                PurchaseError::AlreadyOwned { .. } | PurchaseError::AlreadyPending { .. } => {
                    StatusCode::BAD_REQUEST
                }
                PurchaseError::Gateway { .. } => StatusCode::BAD_GATEWAY,
                PurchaseError::PaymentFailed { .. } => StatusCode::PAYMENT_REQUIRED,
                PurchaseError::InconsistentState { .. } | PurchaseError::Store(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Access(err) => match err {
                AccessError::Unauthenticated => StatusCode::UNAUTHORIZED,
                AccessError::Forbidden(_) => StatusCode::FORBIDDEN,
                AccessError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Domain(err) => match err.code {
                ErrorCode::UserNotFound
                | ErrorCode::MaterialNotFound
                | ErrorCode::PurchaseNotFound => StatusCode::NOT_FOUND,
                ErrorCode::ValidationFailed | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
                ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorCode::Forbidden => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn code(&self) -> String {
        match self {
            ApiError::Purchase(err) => err.code().to_string(),
            ApiError::Access(AccessError::Unauthenticated) => {
                ErrorCode::Unauthorized.to_string()
            }
            ApiError::Access(AccessError::Forbidden(_)) => ErrorCode::Forbidden.to_string(),
            ApiError::Access(AccessError::Unavailable(inner)) => inner.code.to_string(),
            ApiError::Domain(err) => err.code.to_string(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Purchase(err) => err.to_string(),
            ApiError::Access(err) => err.to_string(),
            ApiError::Domain(err) => err.message().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = %self.code(), "request failed: {}", self.message());
        }

        (
            status,
            Json(ErrorResponse {
                error: self.message(),
                code: self.code(),
            }),
        )
            .into_response()
    }
}
