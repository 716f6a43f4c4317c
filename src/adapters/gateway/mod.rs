//! Payment gateway adapters.

mod mock;
mod stripe;

pub use mock::MockPaymentGateway;
pub use stripe::{StripeConfig, StripeGateway};
