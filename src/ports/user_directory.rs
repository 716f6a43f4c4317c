//! User directory port.
//!
//! Users are owned by the external registration/credential collaborators;
//! purchase initiation only needs to know the user exists.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Role, UserId};

/// Read-only lookup of users.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by id. Returns `None` if the user does not exist.
    async fn find(&self, id: UserId) -> Result<Option<UserRecord>, DomainError>;
}

/// Directory view of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub role: Role,
}
