//! HTTP DTOs for purchase endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::MaterialId;
use crate::domain::purchase::{Purchase, PurchaseStatus};

/// Request to start a purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePurchaseRequest {
    /// The material to buy.
    pub material_id: MaterialId,
}

/// Request to reconcile a payment.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmPurchaseRequest {
    /// The gateway transaction id returned at initiation.
    pub transaction_id: String,
}

/// A purchase as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseResponse {
    pub id: String,
    pub user_id: String,
    pub material_id: String,
    /// Amount charged, in major currency units.
    pub amount: Decimal,
    pub currency: String,
    pub status: PurchaseStatus,
    pub transaction_id: Option<String>,
    /// Secret the client uses to complete payment with the gateway.
    pub client_secret: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Purchase> for PurchaseResponse {
    fn from(purchase: Purchase) -> Self {
        Self {
            id: purchase.id.to_string(),
            user_id: purchase.user_id.to_string(),
            material_id: purchase.material_id.to_string(),
            amount: purchase.price_charged.amount(),
            currency: purchase.price_charged.currency().to_string(),
            status: purchase.status,
            transaction_id: purchase.transaction_id,
            client_secret: purchase.client_secret,
            created_at: purchase.created_at.to_rfc3339(),
            updated_at: purchase.updated_at.to_rfc3339(),
        }
    }
}

/// A list of purchases.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseListResponse {
    pub purchases: Vec<PurchaseResponse>,
}

impl PurchaseListResponse {
    pub fn from_purchases(purchases: Vec<Purchase>) -> Self {
        Self {
            purchases: purchases.into_iter().map(PurchaseResponse::from).collect(),
        }
    }
}
