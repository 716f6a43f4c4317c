//! Material catalog port.
//!
//! The catalog is owned by the metadata collaborator; this core only reads
//! it: existence, current price (snapshotted at purchase initiation), and the
//! opaque content reference used by the download path.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, MaterialId, Money};

/// Read-only lookup into the material catalog.
#[async_trait]
pub trait MaterialCatalog: Send + Sync {
    /// Find a material by id. Returns `None` if it does not exist.
    async fn find(&self, id: MaterialId) -> Result<Option<MaterialRecord>, DomainError>;
}

/// Catalog view of a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub id: MaterialId,

    /// Title used in gateway transaction descriptions.
    pub title: String,

    /// Current price. Mutable on the collaborator's side; purchases snapshot
    /// it at initiation.
    pub price: Money,

    /// Opaque reference resolved by the content storage.
    pub content_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_catalog_is_object_safe() {
        fn _accepts_dyn(_catalog: &dyn MaterialCatalog) {}
    }
}
