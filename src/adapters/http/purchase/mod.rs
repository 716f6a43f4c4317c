//! Purchase HTTP module.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::{admin_routes, purchase_routes};
