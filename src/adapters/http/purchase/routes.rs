//! Axum router configuration for purchase endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::AppState;
use super::handlers::{
    confirm_purchase, initiate_purchase, list_all_purchases, list_own_purchases,
};

/// Purchase routes, mounted at `/api/purchases`.
///
/// - `POST /` - start a purchase
/// - `POST /confirm` - reconcile a payment
/// - `GET  /` - the caller's purchase history
pub fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(initiate_purchase).get(list_own_purchases))
        .route("/confirm", post(confirm_purchase))
}

/// Admin routes, mounted at `/api/admin`.
///
/// - `GET /purchases` - all purchases (admin role required)
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/purchases", get(list_all_purchases))
}
