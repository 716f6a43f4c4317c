//! Monetary amount value object.
//!
//! Prices and charges are decimal amounts in a single major currency unit,
//! paired with an ISO 4217 currency code. The payment gateway works in the
//! currency's smallest unit, so the conversion lives here rather than in the
//! adapter.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A non-negative monetary amount with its currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    /// Creates a new amount.
    ///
    /// # Errors
    ///
    /// - `Negative` if the amount is below zero
    /// - `EmptyField` if the currency code is blank
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Result<Self, ValidationError> {
        let currency = currency.into();
        if amount.is_sign_negative() {
            return Err(ValidationError::negative("amount", amount.to_string()));
        }
        if currency.trim().is_empty() {
            return Err(ValidationError::empty_field("currency"));
        }
        Ok(Self {
            amount,
            currency: currency.to_lowercase(),
        })
    }

    /// Creates a zero amount in the given currency.
    pub fn zero(currency: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Decimal::ZERO, currency)
    }

    /// Returns the decimal amount in major units.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the lowercase currency code.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns true for a zero amount.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Converts to the currency's smallest unit (e.g. cents), rounding to
    /// the nearest cent, as payment gateways expect.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` if the amount does not fit in an `i64` after scaling.
    pub fn to_minor_units(&self) -> Result<i64, ValidationError> {
        let scaled = (self.amount * Decimal::from(100)).round();
        scaled.to_i64().ok_or_else(|| {
            ValidationError::invalid_format("amount", "does not fit in minor units")
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
