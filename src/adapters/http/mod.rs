//! HTTP adapter: shared state, router assembly, and per-module endpoints.

pub mod error;
pub mod material;
pub mod middleware;
pub mod purchase;

use std::sync::Arc;

use axum::Router;

use crate::application::handlers::material::GetMaterialContentHandler;
use crate::application::handlers::purchase::{
    CheckOwnershipHandler, ConfirmPurchaseHandler, InitiatePurchaseHandler,
    ListAllPurchasesHandler, ListUserPurchasesHandler,
};
use crate::application::AccessGate;
use crate::ports::{
    ContentStorage, CredentialValidator, EntitlementStore, MaterialCatalog, PaymentGateway,
    UserDirectory,
};

pub use error::{ApiError, ErrorResponse};

/// Shared application state: Arc-wrapped ports plus the access gate, cloned
/// per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntitlementStore>,
    pub catalog: Arc<dyn MaterialCatalog>,
    pub directory: Arc<dyn UserDirectory>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub content: Arc<dyn ContentStorage>,
    pub credential_validator: Arc<dyn CredentialValidator>,
    pub gate: Arc<AccessGate>,
}

impl AppState {
    /// Wire up the state; the access gate reads the same entitlement store
    /// the orchestrator writes.
    pub fn new(
        store: Arc<dyn EntitlementStore>,
        catalog: Arc<dyn MaterialCatalog>,
        directory: Arc<dyn UserDirectory>,
        gateway: Arc<dyn PaymentGateway>,
        content: Arc<dyn ContentStorage>,
        credential_validator: Arc<dyn CredentialValidator>,
    ) -> Self {
        let gate = Arc::new(AccessGate::new(store.clone()));
        Self {
            store,
            catalog,
            directory,
            gateway,
            content,
            credential_validator,
            gate,
        }
    }

    // Handlers are created on demand from the shared state.

    pub fn initiate_purchase_handler(&self) -> InitiatePurchaseHandler {
        InitiatePurchaseHandler::new(
            self.store.clone(),
            self.catalog.clone(),
            self.directory.clone(),
            self.gateway.clone(),
        )
    }

    pub fn confirm_purchase_handler(&self) -> ConfirmPurchaseHandler {
        ConfirmPurchaseHandler::new(self.store.clone(), self.gateway.clone())
    }

    pub fn list_user_purchases_handler(&self) -> ListUserPurchasesHandler {
        ListUserPurchasesHandler::new(self.store.clone())
    }

    pub fn list_all_purchases_handler(&self) -> ListAllPurchasesHandler {
        ListAllPurchasesHandler::new(self.store.clone())
    }

    pub fn check_ownership_handler(&self) -> CheckOwnershipHandler {
        CheckOwnershipHandler::new(self.store.clone())
    }

    pub fn get_material_content_handler(&self) -> GetMaterialContentHandler {
        GetMaterialContentHandler::new(self.catalog.clone(), self.content.clone())
    }
}

/// Build the complete API router with authentication middleware applied.
pub fn api_router(state: AppState) -> Router {
    let validator = state.credential_validator.clone();

    Router::new()
        .nest("/api/purchases", purchase::purchase_routes())
        .nest("/api/admin", purchase::admin_routes())
        .nest("/api/materials", material::material_routes())
        .layer(axum::middleware::from_fn_with_state(
            validator,
            middleware::auth_middleware,
        ))
        .with_state(state)
}
