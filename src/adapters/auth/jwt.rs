//! JWT credential validator.
//!
//! Validates HS256 bearer tokens issued by the external credential service
//! and maps their claims into the domain `Claims` type. Every decode problem
//! — bad signature, expiry, malformed subject, unknown role — fails closed
//! as an auth error; nothing ever degrades to an anonymous caller.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, Claims, Role, UserId};
use crate::ports::CredentialValidator;

/// HS256 validator over a shared signing secret.
pub struct JwtCredentialValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtCredentialValidator {
    /// Create a validator for the given signing secret.
    pub fn new(secret: &SecretString) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

/// Raw claims as encoded in the token.
#[derive(Debug, Deserialize)]
struct TokenClaims {
    /// Subject: the user id.
    sub: String,

    /// Role claim, `USER` or `ADMIN`.
    role: String,

    /// Expiry, validated by the jsonwebtoken crate.
    #[allow(dead_code)]
    exp: usize,
}

#[async_trait]
impl CredentialValidator for JwtCredentialValidator {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let decoded = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;

        let subject: UserId = decoded
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        let role = Role::parse(&decoded.claims.role).ok_or(AuthError::InvalidToken)?;

        Ok(Claims::new(subject, role))
    }
}
