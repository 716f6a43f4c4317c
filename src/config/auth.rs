//! Authentication configuration

use serde::Deserialize;

use super::error::ValidationError;

/// JWT validation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret of the credential service.
    pub jwt_secret: String,
}

impl AuthConfig {
    /// Validate auth configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_JWT_SECRET"));
        }
        Ok(())
    }
}
