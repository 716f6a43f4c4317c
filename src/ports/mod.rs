//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - the remote payment processor (create/poll)
//! - `EntitlementStore` - durable purchase records with atomic create and CAS
//! - `MaterialCatalog` - read-only material metadata collaborator
//! - `UserDirectory` - read-only user collaborator
//! - `CredentialValidator` - bearer token to decoded claims
//! - `ContentStorage` - material content fetch for downloads

mod content_storage;
mod credential_validator;
mod entitlement_store;
mod material_catalog;
mod payment_gateway;
mod user_directory;

pub use content_storage::{ContentFile, ContentStorage};
pub use credential_validator::CredentialValidator;
pub use entitlement_store::{ConflictKind, CreateOutcome, EntitlementStore, Transition};
pub use material_catalog::{MaterialCatalog, MaterialRecord};
pub use payment_gateway::{
    CreateTransactionRequest, GatewayError, GatewayErrorCode, GatewayPaymentStatus,
    GatewayTransaction, PaymentGateway,
};
pub use user_directory::{UserDirectory, UserRecord};
