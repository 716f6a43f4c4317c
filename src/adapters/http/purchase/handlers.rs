//! HTTP handlers for purchase endpoints.
//!
//! Each handler builds the explicit access context (claims + action), runs it
//! through the gate, then delegates to the application-layer handler.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::purchase::{ConfirmPurchaseCommand, InitiatePurchaseCommand};
use crate::application::ProtectedAction;

use super::super::error::ApiError;
use super::super::middleware::OptionalAuth;
use super::super::AppState;
use super::dto::{
    ConfirmPurchaseRequest, InitiatePurchaseRequest, PurchaseListResponse, PurchaseResponse,
};

/// `POST /api/purchases` - start a purchase.
pub async fn initiate_purchase(
    State(state): State<AppState>,
    OptionalAuth(claims): OptionalAuth,
    Json(request): Json<InitiatePurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state
        .gate
        .authorize(claims, &ProtectedAction::InitiatePurchase)
        .await?;

    let purchase = state
        .initiate_purchase_handler()
        .handle(InitiatePurchaseCommand {
            user_id: claims.subject,
            material_id: request.material_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PurchaseResponse::from(purchase))))
}

/// `POST /api/purchases/confirm` - reconcile a payment.
///
/// A still-processing payment is a 200 with `"status": "processing"`; the
/// client retries later.
pub async fn confirm_purchase(
    State(state): State<AppState>,
    OptionalAuth(claims): OptionalAuth,
    Json(request): Json<ConfirmPurchaseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .authorize(claims, &ProtectedAction::ConfirmPurchase)
        .await?;

    let purchase = state
        .confirm_purchase_handler()
        .handle(ConfirmPurchaseCommand {
            transaction_id: request.transaction_id,
        })
        .await?;

    Ok(Json(PurchaseResponse::from(purchase)))
}

/// `GET /api/purchases` - the caller's purchase history.
pub async fn list_own_purchases(
    State(state): State<AppState>,
    OptionalAuth(claims): OptionalAuth,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state
        .gate
        .authorize(claims, &ProtectedAction::ListOwnPurchases)
        .await?;

    let purchases = state
        .list_user_purchases_handler()
        .handle(claims.subject)
        .await?;

    Ok(Json(PurchaseListResponse::from_purchases(purchases)))
}

/// `GET /api/admin/purchases` - every purchase in the system.
pub async fn list_all_purchases(
    State(state): State<AppState>,
    OptionalAuth(claims): OptionalAuth,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .authorize(claims, &ProtectedAction::ListAllPurchases)
        .await?;

    let purchases = state.list_all_purchases_handler().handle().await?;

    Ok(Json(PurchaseListResponse::from_purchases(purchases)))
}
