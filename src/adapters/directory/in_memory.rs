//! In-memory user directory.
//!
//! Users live with the external registration collaborator; this stand-in
//! serves tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{UserDirectory, UserRecord};

/// In-memory, read-only user directory.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<UserId, UserRecord>,
}

impl InMemoryUserDirectory {
    /// Create a directory seeded with the given users.
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find(&self, id: UserId) -> Result<Option<UserRecord>, DomainError> {
        Ok(self.users.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Role;

    #[tokio::test]
    async fn find_returns_seeded_user() {
        let record = UserRecord {
            id: UserId::new(),
            role: Role::User,
        };
        let directory = InMemoryUserDirectory::with_users(vec![record.clone()]);

        assert_eq!(directory.find(record.id).await.unwrap(), Some(record));
        assert_eq!(directory.find(UserId::new()).await.unwrap(), None);
    }
}
