//! Access control gate.
//!
//! Authorization is an explicit, per-request decision over a context object
//! (decoded claims plus the requested action), not ambient middleware state.
//! The decision table:
//!
//! | claims           | action                         | decision          |
//! |------------------|--------------------------------|-------------------|
//! | missing/invalid  | any                            | `Unauthenticated` |
//! | ADMIN            | any                            | allow             |
//! | USER             | role-only (browse, history)    | allow             |
//! | USER             | `DownloadMaterial`             | allow iff owned   |
//! | USER             | admin-only (`ListAllPurchases`)| `Forbidden`       |
//!
//! The ownership check is a fresh read against the entitlement store on every
//! request; a concurrent confirmation is visible immediately and a refund is
//! never served from a stale answer. Fail closed: if the store cannot answer,
//! access is denied.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{Claims, DomainError, MaterialId};
use crate::ports::EntitlementStore;

/// An operation a caller wants to perform, with the resource it targets
/// where the decision depends on one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtectedAction {
    /// Start a purchase. Role-only.
    InitiatePurchase,

    /// Reconcile a payment. Role-only.
    ConfirmPurchase,

    /// List the caller's own purchase history. Role-only.
    ListOwnPurchases,

    /// Ask whether the caller owns a material. Role-only.
    CheckOwnership,

    /// Fetch material content. Ownership-gated for users.
    DownloadMaterial(MaterialId),

    /// List every purchase in the system. Admin-only.
    ListAllPurchases,
}

impl ProtectedAction {
    /// Returns true for actions only admins may perform.
    fn is_admin_only(&self) -> bool {
        matches!(self, ProtectedAction::ListAllPurchases)
    }
}

/// Why access was denied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No valid credential was presented.
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller is authenticated but not allowed.
    #[error("{0}")]
    Forbidden(ForbiddenReason),

    /// The entitlement store could not answer; access is denied.
    #[error("Access check unavailable: {0}")]
    Unavailable(DomainError),
}

/// Specific reason for a `Forbidden` decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForbiddenReason {
    /// The action requires the admin role.
    AdminOnly,

    /// The caller does not own the requested material.
    NotOwned(MaterialId),
}

impl std::fmt::Display for ForbiddenReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForbiddenReason::AdminOnly => write!(f, "This operation requires the admin role"),
            ForbiddenReason::NotOwned(id) => {
                write!(f, "Material {} has not been purchased", id)
            }
        }
    }
}

/// The gate itself: decision table plus a live entitlement read.
pub struct AccessGate {
    entitlements: Arc<dyn EntitlementStore>,
}

impl AccessGate {
    pub fn new(entitlements: Arc<dyn EntitlementStore>) -> Self {
        Self { entitlements }
    }

    /// Authorize `action` for the caller described by `claims`.
    ///
    /// Returns the claims back on success so handlers can use the verified
    /// subject without re-extracting it.
    pub async fn authorize(
        &self,
        claims: Option<Claims>,
        action: &ProtectedAction,
    ) -> Result<Claims, AccessError> {
        let claims = claims.ok_or(AccessError::Unauthenticated)?;

        if claims.is_admin() {
            return Ok(claims);
        }

        if action.is_admin_only() {
            return Err(AccessError::Forbidden(ForbiddenReason::AdminOnly));
        }

        if let ProtectedAction::DownloadMaterial(material_id) = action {
            let owned = self
                .entitlements
                .is_owned(claims.subject, *material_id)
                .await
                .map_err(AccessError::Unavailable)?;
            if !owned {
                return Err(AccessError::Forbidden(ForbiddenReason::NotOwned(
                    *material_id,
                )));
            }
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Role, UserId};
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::purchase::{Purchase, PurchaseStatus};
    use crate::ports::{CreateOutcome, Transition};
    use crate::domain::foundation::PurchaseId;

    /// Store stub: a fixed set of owned pairs, optional failure injection,
    /// and a counter proving the gate reads live every time.
    struct StubStore {
        owned: Vec<(UserId, MaterialId)>,
        fail: bool,
        reads: Mutex<u32>,
    }

    impl StubStore {
        fn owning(pairs: Vec<(UserId, MaterialId)>) -> Self {
            Self {
                owned: pairs,
                fail: false,
                reads: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                owned: vec![],
                fail: true,
                reads: Mutex::new(0),
            }
        }

        fn read_count(&self) -> u32 {
            *self.reads.lock().unwrap()
        }
    }

    #[async_trait]
    impl EntitlementStore for StubStore {
        async fn create_if_absent(
            &self,
            purchase: Purchase,
        ) -> Result<CreateOutcome, DomainError> {
            Ok(CreateOutcome::Created(purchase))
        }

        async fn mark_created(
            &self,
            _id: PurchaseId,
            _transaction_id: &str,
            _client_secret: &str,
        ) -> Result<Purchase, DomainError> {
            unimplemented!("not used by gate tests")
        }

        async fn transition(
            &self,
            _id: PurchaseId,
            _expected: PurchaseStatus,
            _next: PurchaseStatus,
        ) -> Result<Transition, DomainError> {
            unimplemented!("not used by gate tests")
        }

        async fn find_by_transaction_id(
            &self,
            _transaction_id: &str,
        ) -> Result<Option<Purchase>, DomainError> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: PurchaseId) -> Result<Option<Purchase>, DomainError> {
            Ok(None)
        }

        async fn is_owned(
            &self,
            user_id: UserId,
            material_id: MaterialId,
        ) -> Result<bool, DomainError> {
            *self.reads.lock().unwrap() += 1;
            if self.fail {
                return Err(DomainError::database("store offline"));
            }
            Ok(self.owned.contains(&(user_id, material_id)))
        }

        async fn list_for_user(&self, _user_id: UserId) -> Result<Vec<Purchase>, DomainError> {
            Ok(vec![])
        }

        async fn list_all(&self) -> Result<Vec<Purchase>, DomainError> {
            Ok(vec![])
        }
    }

    fn user_claims() -> Claims {
        Claims::new(UserId::new(), Role::User)
    }

    fn admin_claims() -> Claims {
        Claims::new(UserId::new(), Role::Admin)
    }

    #[tokio::test]
    async fn missing_credential_is_unauthenticated_for_every_action() {
        let gate = AccessGate::new(Arc::new(StubStore::owning(vec![])));
        for action in [
            ProtectedAction::InitiatePurchase,
            ProtectedAction::ListOwnPurchases,
            ProtectedAction::DownloadMaterial(MaterialId::new()),
            ProtectedAction::ListAllPurchases,
        ] {
            let result = gate.authorize(None, &action).await;
            assert_eq!(result, Err(AccessError::Unauthenticated));
        }
    }

    #[tokio::test]
    async fn admin_bypasses_ownership_and_reads_nothing() {
        let store = Arc::new(StubStore::owning(vec![]));
        let gate = AccessGate::new(store.clone());

        let result = gate
            .authorize(
                Some(admin_claims()),
                &ProtectedAction::DownloadMaterial(MaterialId::new()),
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn admin_allowed_on_admin_only_action() {
        let gate = AccessGate::new(Arc::new(StubStore::owning(vec![])));
        let result = gate
            .authorize(Some(admin_claims()), &ProtectedAction::ListAllPurchases)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn user_forbidden_on_admin_only_action() {
        let gate = AccessGate::new(Arc::new(StubStore::owning(vec![])));
        let result = gate
            .authorize(Some(user_claims()), &ProtectedAction::ListAllPurchases)
            .await;
        assert_eq!(
            result,
            Err(AccessError::Forbidden(ForbiddenReason::AdminOnly))
        );
    }

    #[tokio::test]
    async fn user_allowed_on_role_only_actions() {
        let gate = AccessGate::new(Arc::new(StubStore::owning(vec![])));
        for action in [
            ProtectedAction::InitiatePurchase,
            ProtectedAction::ConfirmPurchase,
            ProtectedAction::ListOwnPurchases,
            ProtectedAction::CheckOwnership,
        ] {
            let result = gate.authorize(Some(user_claims()), &action).await;
            assert!(result.is_ok(), "expected allow for {:?}", action);
        }
    }

    #[tokio::test]
    async fn download_allowed_only_when_owned() {
        let claims = user_claims();
        let owned_material = MaterialId::new();
        let other_material = MaterialId::new();
        let gate = AccessGate::new(Arc::new(StubStore::owning(vec![(
            claims.subject,
            owned_material,
        )])));

        let allowed = gate
            .authorize(
                Some(claims.clone()),
                &ProtectedAction::DownloadMaterial(owned_material),
            )
            .await;
        assert!(allowed.is_ok());

        let denied = gate
            .authorize(
                Some(claims),
                &ProtectedAction::DownloadMaterial(other_material),
            )
            .await;
        assert_eq!(
            denied,
            Err(AccessError::Forbidden(ForbiddenReason::NotOwned(
                other_material
            )))
        );
    }

    #[tokio::test]
    async fn ownership_is_read_fresh_on_every_request() {
        let claims = user_claims();
        let material = MaterialId::new();
        let store = Arc::new(StubStore::owning(vec![(claims.subject, material)]));
        let gate = AccessGate::new(store.clone());

        for _ in 0..3 {
            gate.authorize(
                Some(claims.clone()),
                &ProtectedAction::DownloadMaterial(material),
            )
            .await
            .unwrap();
        }

        assert_eq!(store.read_count(), 3);
    }

    #[tokio::test]
    async fn store_failure_denies_access() {
        let gate = AccessGate::new(Arc::new(StubStore::failing()));
        let result = gate
            .authorize(
                Some(user_claims()),
                &ProtectedAction::DownloadMaterial(MaterialId::new()),
            )
            .await;
        assert!(matches!(result, Err(AccessError::Unavailable(_))));
    }
}
