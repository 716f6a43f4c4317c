//! Foundation types shared across the domain.
//!
//! Value objects, identifiers, and error types with no dependencies on
//! specific aggregates.

mod claims;
mod errors;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use claims::{AuthError, Claims, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{MaterialId, PurchaseId, UserId};
pub use money::Money;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
