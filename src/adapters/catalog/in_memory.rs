//! In-memory material catalog.
//!
//! The catalog is an external collaborator; this stand-in serves tests and
//! local development with a seeded, read-only set of materials.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MaterialId};
use crate::ports::{MaterialCatalog, MaterialRecord};

/// In-memory, read-only catalog.
#[derive(Default)]
pub struct InMemoryMaterialCatalog {
    materials: HashMap<MaterialId, MaterialRecord>,
}

impl InMemoryMaterialCatalog {
    /// Create a catalog seeded with the given materials.
    pub fn with_materials(materials: Vec<MaterialRecord>) -> Self {
        Self {
            materials: materials.into_iter().map(|m| (m.id, m)).collect(),
        }
    }
}

#[async_trait]
impl MaterialCatalog for InMemoryMaterialCatalog {
    async fn find(&self, id: MaterialId) -> Result<Option<MaterialRecord>, DomainError> {
        Ok(self.materials.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn find_returns_seeded_material() {
        let record = MaterialRecord {
            id: MaterialId::new(),
            title: "Microeconomics Summary".to_string(),
            price: Money::new(Decimal::from(30), "usd").unwrap(),
            content_ref: "micro.pdf".to_string(),
        };
        let catalog = InMemoryMaterialCatalog::with_materials(vec![record.clone()]);

        assert_eq!(catalog.find(record.id).await.unwrap(), Some(record));
        assert_eq!(catalog.find(MaterialId::new()).await.unwrap(), None);
    }
}
