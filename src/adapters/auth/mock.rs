//! Mock credential validator for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, Claims};
use crate::ports::CredentialValidator;

/// Mock validator mapping fixed tokens to claims.
///
/// Unknown tokens are rejected, matching the fail-closed behavior of the
/// real validator.
#[derive(Default)]
pub struct MockCredentialValidator {
    tokens: Mutex<HashMap<String, Claims>>,
}

impl MockCredentialValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token that validates to the given claims.
    pub fn with_token(self, token: impl Into<String>, claims: Claims) -> Self {
        self.tokens.lock().unwrap().insert(token.into(), claims);
        self
    }
}

#[async_trait]
impl CredentialValidator for MockCredentialValidator {
    async fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.tokens
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Role, UserId};

    #[tokio::test]
    async fn known_token_validates() {
        let claims = Claims::new(UserId::new(), Role::User);
        let validator = MockCredentialValidator::new().with_token("tok", claims.clone());

        assert_eq!(validator.validate("tok").await.unwrap(), claims);
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let validator = MockCredentialValidator::new();
        assert_eq!(
            validator.validate("ghost").await,
            Err(AuthError::InvalidToken)
        );
    }
}
