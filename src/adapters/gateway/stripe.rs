//! Stripe payment gateway adapter.
//!
//! Implements `PaymentGateway` over the Stripe PaymentIntents API. Requests
//! are form-encoded with basic auth, as Stripe expects, and carry a bounded
//! timeout so a hung gateway call cannot pin a request forever.
//!
//! Status mapping: Stripe intents sit in several states while the buyer is
//! still acting (`requires_payment_method`, `requires_confirmation`,
//! `requires_action`, `requires_capture`) — all of those, plus `processing`,
//! are in-progress from our side. A declined attempt returns the intent to
//! `requires_payment_method`, so it stays confirmable; `canceled` is the
//! terminal failure signal.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{
    CreateTransactionRequest, GatewayError, GatewayPaymentStatus, GatewayTransaction,
    PaymentGateway,
};

/// Default bound on a single gateway call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API (overridable for tests).
    api_base_url: String,

    /// Per-request timeout.
    timeout: Duration,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stripe gateway adapter.
pub struct StripeGateway {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeGateway {
    /// Create a new adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn map_request_error(err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::timeout(err.to_string())
        } else {
            GatewayError::network(err.to_string())
        }
    }

    async fn map_error_response(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(status = %status, body = %body, "Stripe API error");

        if status.is_server_error() || status.as_u16() == 429 {
            GatewayError::provider(format!("Stripe returned {}", status))
        } else if status.as_u16() == 401 || status.as_u16() == 403 {
            GatewayError::authentication(format!("Stripe rejected credentials: {}", status))
        } else if status.as_u16() == 404 {
            GatewayError::new(
                crate::ports::GatewayErrorCode::NotFound,
                "Stripe object not found",
            )
        } else {
            GatewayError::invalid_request(format!("Stripe rejected request: {}", body))
        }
    }

    fn map_intent_status(status: &str) -> GatewayPaymentStatus {
        match status {
            "succeeded" => GatewayPaymentStatus::Succeeded,
            "canceled" => GatewayPaymentStatus::Canceled,
            // processing and all requires_* states: the buyer or the banks
            // are still working on it.
            _ => GatewayPaymentStatus::Processing,
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<GatewayTransaction, GatewayError> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let amount = request
            .amount
            .to_minor_units()
            .map_err(|e| GatewayError::invalid_request(e.to_string()))?;

        let params = [
            ("amount", amount.to_string()),
            ("currency", request.amount.currency().to_string()),
            ("description", request.description.clone()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .http_client
            .post(&url)
            .timeout(self.config.timeout)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        if !response.status().is_success() {
            return Err(Self::map_error_response(response).await);
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            GatewayError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = intent.client_secret.ok_or_else(|| {
            GatewayError::provider("Stripe returned an intent without a client secret")
        })?;

        Ok(GatewayTransaction {
            transaction_id: intent.id,
            client_secret,
        })
    }

    async fn get_status(&self, transaction_id: &str) -> Result<GatewayPaymentStatus, GatewayError> {
        let url = format!(
            "{}/v1/payment_intents/{}",
            self.config.api_base_url, transaction_id
        );

        let response = self
            .http_client
            .get(&url)
            .timeout(self.config.timeout)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(Self::map_request_error)?;

        if !response.status().is_success() {
            return Err(Self::map_error_response(response).await);
        }

        let intent: StripePaymentIntent = response.json().await.map_err(|e| {
            GatewayError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(Self::map_intent_status(&intent.status))
    }
}

/// The subset of Stripe's PaymentIntent object we read.
#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    status: String,
    client_secret: Option<String>,
}
