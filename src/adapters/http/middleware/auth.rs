//! Authentication middleware and extractors for axum.
//!
//! The middleware validates Bearer tokens through the `CredentialValidator`
//! port and injects the decoded `Claims` into request extensions. It stays
//! provider-agnostic: swapping the JWT validator for a mock changes nothing
//! here.
//!
//! ```text
//! Request → auth_middleware → injects Claims into extensions
//!                                      ↓
//!                      Handler → OptionalAuth reads from extensions
//!                                      ↓
//!                      AccessGate decides from the explicit context
//! ```
//!
//! A request without a token passes through with no claims; the access gate
//! is the component that turns "no claims" into `Unauthenticated`. A request
//! with an *invalid* token is rejected here with 401 — a bad credential is
//! never downgraded to an anonymous call.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, Claims};
use crate::ports::CredentialValidator;

/// Middleware state: the credential validator.
pub type AuthState = Arc<dyn CredentialValidator>;

/// Authentication middleware that validates Bearer tokens.
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match validator.validate(token).await {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
                next.run(request).await
            }
            Err(e) => {
                let (status, message) = match &e {
                    AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!("credential service unavailable: {}", msg);
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "Authentication service unavailable",
                        )
                    }
                };

                (
                    status,
                    Json(serde_json::json!({
                        "error": message,
                        "code": "AUTH_ERROR"
                    })),
                )
                    .into_response()
            }
        },
        None => next.run(request).await,
    }
}

/// Extractor for optional authentication.
///
/// Yields `Some(claims)` when the middleware validated a token, `None`
/// otherwise. Handlers pass the option straight into the access gate, which
/// owns the decision table (including the missing-credential row).
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Claims>);

impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let claims = parts.extensions.get::<Claims>().cloned();
            Ok(OptionalAuth(claims))
        })
    }
}
