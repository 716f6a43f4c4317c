//! Integration tests for download gating around the purchase lifecycle.
//!
//! Exercises the access gate against the same entitlement store the
//! orchestrator writes, so the tests observe exactly what a request would:
//! a purchase that is merely Created does not grant the download, a
//! confirmation flips it, a refund revokes it, and admins bypass it all.

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use page_gate::adapters::catalog::InMemoryMaterialCatalog;
use page_gate::adapters::directory::InMemoryUserDirectory;
use page_gate::adapters::gateway::MockPaymentGateway;
use page_gate::adapters::store::InMemoryEntitlementStore;
use page_gate::application::handlers::purchase::{
    ConfirmPurchaseCommand, ConfirmPurchaseHandler, InitiatePurchaseCommand,
    InitiatePurchaseHandler,
};
use page_gate::application::{AccessError, AccessGate, ForbiddenReason, ProtectedAction};
use page_gate::domain::foundation::{Claims, MaterialId, Money, Role, UserId};
use page_gate::domain::purchase::PurchaseStatus;
use page_gate::ports::{EntitlementStore, GatewayPaymentStatus, MaterialRecord, UserRecord};

struct TestApp {
    store: Arc<InMemoryEntitlementStore>,
    gateway: Arc<MockPaymentGateway>,
    initiate: InitiatePurchaseHandler,
    confirm: ConfirmPurchaseHandler,
    gate: AccessGate,
    buyer: Claims,
    admin: Claims,
    material: MaterialId,
}

fn test_app() -> TestApp {
    let buyer = Claims::new(UserId::new(), Role::User);
    let admin = Claims::new(UserId::new(), Role::Admin);
    let material = MaterialId::new();

    let store = Arc::new(InMemoryEntitlementStore::new());
    let gateway = Arc::new(MockPaymentGateway::new());
    let catalog = Arc::new(InMemoryMaterialCatalog::with_materials(vec![MaterialRecord {
        id: material,
        title: "Organic Chemistry Flashcards".to_string(),
        price: Money::new(Decimal::from_str("450.00").unwrap(), "usd").unwrap(),
        content_ref: "ochem-flashcards.pdf".to_string(),
    }]));
    let directory = Arc::new(InMemoryUserDirectory::with_users(vec![UserRecord {
        id: buyer.subject,
        role: Role::User,
    }]));

    TestApp {
        initiate: InitiatePurchaseHandler::new(
            store.clone(),
            catalog,
            directory,
            gateway.clone(),
        ),
        confirm: ConfirmPurchaseHandler::new(store.clone(), gateway.clone()),
        gate: AccessGate::new(store.clone()),
        store,
        gateway,
        buyer,
        admin,
        material,
    }
}

impl TestApp {
    async fn buy_up_to_created(&self) -> String {
        let purchase = self
            .initiate
            .handle(InitiatePurchaseCommand {
                user_id: self.buyer.subject,
                material_id: self.material,
            })
            .await
            .unwrap();
        purchase.transaction_id.unwrap()
    }

    async fn settle(&self, tx: &str) {
        self.gateway.set_status(tx, GatewayPaymentStatus::Succeeded);
        let purchase = self
            .confirm
            .handle(ConfirmPurchaseCommand {
                transaction_id: tx.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(purchase.status, PurchaseStatus::Completed);
    }

    async fn try_download(&self, claims: Option<Claims>) -> Result<Claims, AccessError> {
        self.gate
            .authorize(claims, &ProtectedAction::DownloadMaterial(self.material))
            .await
    }
}

#[tokio::test]
async fn download_denied_before_confirmation_allowed_after() {
    let app = test_app();
    let tx = app.buy_up_to_created().await;

    // Paid-for-but-unconfirmed is not ownership.
    let denied = app.try_download(Some(app.buyer.clone())).await;
    assert_eq!(
        denied,
        Err(AccessError::Forbidden(ForbiddenReason::NotOwned(
            app.material
        )))
    );

    app.settle(&tx).await;

    // The very next request sees the fresh entitlement.
    let allowed = app.try_download(Some(app.buyer.clone())).await;
    assert!(allowed.is_ok());
}

#[tokio::test]
async fn admin_downloads_without_any_purchase() {
    let app = test_app();

    let allowed = app.try_download(Some(app.admin.clone())).await;
    assert!(allowed.is_ok());
}

#[tokio::test]
async fn missing_credential_is_unauthenticated_even_for_owned_material() {
    let app = test_app();
    let tx = app.buy_up_to_created().await;
    app.settle(&tx).await;

    let result = app.try_download(None).await;
    assert_eq!(result, Err(AccessError::Unauthenticated));
}

#[tokio::test]
async fn refund_revokes_access_on_the_next_request() {
    let app = test_app();
    let tx = app.buy_up_to_created().await;
    app.settle(&tx).await;
    assert!(app.try_download(Some(app.buyer.clone())).await.is_ok());

    // Out-of-band refund recorded in the store.
    let purchase = app
        .store
        .find_by_transaction_id(&tx)
        .await
        .unwrap()
        .unwrap();
    app.store
        .transition(purchase.id, PurchaseStatus::Completed, PurchaseStatus::Refunded)
        .await
        .unwrap();

    // No cached "owned" survives: the live read now denies.
    let denied = app.try_download(Some(app.buyer.clone())).await;
    assert_eq!(
        denied,
        Err(AccessError::Forbidden(ForbiddenReason::NotOwned(
            app.material
        )))
    );
}

#[tokio::test]
async fn user_cannot_reach_admin_listing() {
    let app = test_app();

    let result = app
        .gate
        .authorize(Some(app.buyer.clone()), &ProtectedAction::ListAllPurchases)
        .await;
    assert_eq!(
        result,
        Err(AccessError::Forbidden(ForbiddenReason::AdminOnly))
    );

    let admin_result = app
        .gate
        .authorize(Some(app.admin.clone()), &ProtectedAction::ListAllPurchases)
        .await;
    assert!(admin_result.is_ok());
}

#[tokio::test]
async fn other_users_never_inherit_an_entitlement() {
    let app = test_app();
    let tx = app.buy_up_to_created().await;
    app.settle(&tx).await;

    let stranger = Claims::new(UserId::new(), Role::User);
    let result = app.try_download(Some(stranger)).await;
    assert!(matches!(result, Err(AccessError::Forbidden(_))));
}
