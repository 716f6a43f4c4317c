//! Purchase command and query handlers: the purchase orchestrator.

mod confirm_purchase;
mod initiate_purchase;
mod list_purchases;

pub use confirm_purchase::{ConfirmPurchaseCommand, ConfirmPurchaseHandler};
pub use initiate_purchase::{InitiatePurchaseCommand, InitiatePurchaseHandler};
pub use list_purchases::{
    CheckOwnershipHandler, ListAllPurchasesHandler, ListUserPurchasesHandler,
};
