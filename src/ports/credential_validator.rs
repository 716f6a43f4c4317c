//! Credential validator port.
//!
//! Validates the opaque bearer token issued by the external credential
//! service and returns the decoded claims. The core trusts only these
//! decoded claims and never re-derives them.
//!
//! # Design
//!
//! Fail closed: every decode or signature problem is an `AuthError`, never a
//! silent downgrade to an anonymous caller.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Claims};

/// Port for validating bearer credentials.
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Validate a bearer token and return its claims.
    async fn validate(&self, token: &str) -> Result<Claims, AuthError>;
}
