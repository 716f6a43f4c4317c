//! Credential claims extracted from a validated bearer token.
//!
//! These types carry what the external credential service asserts about the
//! caller: who they are and which role they hold. They have no provider
//! dependencies; any token scheme can populate them through the
//! `CredentialValidator` port. The core never re-derives these attributes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Role assigned to a user by the credential service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Parses the role claim value. Unknown values are rejected, never
    /// defaulted: an unrecognized role must fail closed.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Returns the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// Decoded, trusted claims of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the authenticated user's id.
    pub subject: UserId,

    /// Role asserted by the credential service.
    pub role: Role,
}

impl Claims {
    pub fn new(subject: UserId, role: Role) -> Self {
        Self { subject, role }
    }

    /// Returns true if the caller holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Errors produced while validating a credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The credential service could not be reached.
    #[error("Credential service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
