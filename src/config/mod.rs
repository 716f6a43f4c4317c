//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `PAGE_GATE`
//! prefix; nested sections use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use page_gate::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod auth;
mod database;
mod error;
mod payment;
mod server;
mod storage;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (JWT validation)
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Content storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file if present (development), then environment
    /// variables with the `PAGE_GATE` prefix:
    ///
    /// - `PAGE_GATE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `PAGE_GATE__DATABASE__URL=...` -> `database.url = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAGE_GATE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration sections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.payment.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://localhost/page_gate".to_string(),
                max_connections: 5,
            },
            auth: AuthConfig {
                jwt_secret: "secret".to_string(),
            },
            payment: PaymentConfig {
                stripe_api_key: "sk_test_xxx".to_string(),
                ..Default::default()
            },
            storage: StorageConfig::default(),
        }
    }

    #[test]
    fn complete_config_validates() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validation_surfaces_first_invalid_section() {
        let mut config = valid_config();
        config.payment.stripe_api_key = String::new();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("PAYMENT_STRIPE_API_KEY"))
        );
    }
}
