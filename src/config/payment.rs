//! Payment configuration (Stripe)

use serde::Deserialize;

use super::error::ValidationError;

/// Payment gateway configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key.
    pub stripe_api_key: String,

    /// Store currency (single-currency store).
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Bound on a single gateway call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            stripe_api_key: String::new(),
            currency: default_currency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PaymentConfig {
    /// Check if using Stripe test mode.
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    /// Validate payment configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_STRIPE_API_KEY"));
        }
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if self.currency.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT_CURRENCY"));
        }
        Ok(())
    }
}
