//! PostgreSQL implementation of the entitlement store.
//!
//! Atomicity mapping:
//! - `create_if_absent` relies on the partial unique index
//!   `uq_purchases_active (user_id, material_id) WHERE status NOT IN
//!   ('failed','refunded')` (see `migrations/`): the insert either lands or
//!   conflicts in one statement, and a conflict is classified by re-reading
//!   the blocking row.
//! - `transition` is `UPDATE ... WHERE id = $1 AND status = $2`: the
//!   compare-and-swap happens inside the database, so concurrent
//!   confirmations cannot overwrite each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, MaterialId, Money, PurchaseId, StateMachine, Timestamp, UserId,
};
use crate::domain::purchase::{Purchase, PurchaseStatus};
use crate::ports::{ConflictKind, CreateOutcome, EntitlementStore, Transition};

/// PostgreSQL entitlement store.
pub struct PostgresEntitlementStore {
    pool: PgPool,
}

impl PostgresEntitlementStore {
    /// Creates a new store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_active_for_pair(
        &self,
        user_id: UserId,
        material_id: MaterialId,
    ) -> Result<Option<Purchase>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, material_id, price_amount, price_currency,
                   status, transaction_id, client_secret, created_at, updated_at
            FROM purchases
            WHERE user_id = $1 AND material_id = $2
              AND status NOT IN ('failed', 'refunded')
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(material_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Purchase::try_from).transpose()
    }

    async fn fetch_by_id(&self, id: PurchaseId) -> Result<Option<Purchase>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, material_id, price_amount, price_currency,
                   status, transaction_id, client_secret, created_at, updated_at
            FROM purchases
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Purchase::try_from).transpose()
    }
}

#[async_trait]
impl EntitlementStore for PostgresEntitlementStore {
    async fn create_if_absent(&self, purchase: Purchase) -> Result<CreateOutcome, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO purchases
                (id, user_id, material_id, price_amount, price_currency,
                 status, transaction_id, client_secret, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id, material_id)
                WHERE status NOT IN ('failed', 'refunded')
                DO NOTHING
            "#,
        )
        .bind(purchase.id.as_uuid())
        .bind(purchase.user_id.as_uuid())
        .bind(purchase.material_id.as_uuid())
        .bind(purchase.price_charged.amount())
        .bind(purchase.price_charged.currency())
        .bind(purchase.status.as_str())
        .bind(&purchase.transaction_id)
        .bind(&purchase.client_secret)
        .bind(purchase.created_at.as_datetime())
        .bind(purchase.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 1 {
            return Ok(CreateOutcome::Created(purchase));
        }

        // Insert conflicted: classify by the row that blocked it. If the
        // blocker settled in between, the caller's retry will get through.
        match self
            .fetch_active_for_pair(purchase.user_id, purchase.material_id)
            .await?
        {
            Some(existing) if existing.grants_ownership() => {
                Ok(CreateOutcome::Conflict(ConflictKind::CompletedExists))
            }
            _ => Ok(CreateOutcome::Conflict(ConflictKind::ActiveExists)),
        }
    }

    async fn mark_created(
        &self,
        id: PurchaseId,
        transaction_id: &str,
        client_secret: &str,
    ) -> Result<Purchase, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            UPDATE purchases
            SET status = 'created', transaction_id = $2, client_secret = $3,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, user_id, material_id, price_amount, price_currency,
                      status, transaction_id, client_secret, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(transaction_id)
        .bind(client_secret)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => Purchase::try_from(row),
            None => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Purchase {} is not a pending placeholder", id),
            )),
        }
    }

    async fn transition(
        &self,
        id: PurchaseId,
        expected: PurchaseStatus,
        next: PurchaseStatus,
    ) -> Result<Transition, DomainError> {
        // Validate monotonicity before touching the database.
        expected.transition_to(next).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
        })?;

        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            UPDATE purchases
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING id, user_id, material_id, price_amount, price_currency,
                      status, transaction_id, client_secret, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        if let Some(row) = row {
            return Ok(Transition::Applied(Purchase::try_from(row)?));
        }

        // CAS missed: hand back whatever the winner wrote.
        match self.fetch_by_id(id).await? {
            Some(current) => Ok(Transition::Stale(current)),
            None => Err(DomainError::new(
                ErrorCode::PurchaseNotFound,
                format!("Purchase not found: {}", id),
            )),
        }
    }

    async fn find_by_transaction_id(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Purchase>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, material_id, price_amount, price_currency,
                   status, transaction_id, client_secret, created_at, updated_at
            FROM purchases
            WHERE transaction_id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Purchase::try_from).transpose()
    }

    async fn find_by_id(&self, id: PurchaseId) -> Result<Option<Purchase>, DomainError> {
        self.fetch_by_id(id).await
    }

    async fn is_owned(
        &self,
        user_id: UserId,
        material_id: MaterialId,
    ) -> Result<bool, DomainError> {
        let owned: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM purchases
                WHERE user_id = $1 AND material_id = $2 AND status = 'completed'
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(material_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(owned.0)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Purchase>, DomainError> {
        let rows: Vec<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, material_id, price_amount, price_currency,
                   status, transaction_id, client_secret, created_at, updated_at
            FROM purchases
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Purchase::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<Purchase>, DomainError> {
        let rows: Vec<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, material_id, price_amount, price_currency,
                   status, transaction_id, client_secret, created_at, updated_at
            FROM purchases
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(Purchase::try_from).collect()
    }
}

fn db_err(err: sqlx::Error) -> DomainError {
    DomainError::database(err.to_string())
}

/// Database row representation of a purchase.
#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    user_id: Uuid,
    material_id: Uuid,
    price_amount: Decimal,
    price_currency: String,
    status: String,
    transaction_id: Option<String>,
    client_secret: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = DomainError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        let status = PurchaseStatus::parse(&row.status).ok_or_else(|| {
            DomainError::database(format!("Invalid status value: {}", row.status))
        })?;

        let price_charged = Money::new(row.price_amount, row.price_currency)
            .map_err(|e| DomainError::database(format!("Invalid stored price: {}", e)))?;

        Ok(Purchase {
            id: PurchaseId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            material_id: MaterialId::from_uuid(row.material_id),
            price_charged,
            status,
            transaction_id: row.transaction_id,
            client_secret: row.client_secret,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}
