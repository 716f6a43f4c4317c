//! GetMaterialContentHandler - resolves a material to its file bytes.
//!
//! Authorization has already happened at the gate by the time this runs;
//! this handler only resolves the catalog record and fetches the blob.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, MaterialId};
use crate::ports::{ContentFile, ContentStorage, MaterialCatalog};

pub struct GetMaterialContentHandler {
    catalog: Arc<dyn MaterialCatalog>,
    content: Arc<dyn ContentStorage>,
}

impl GetMaterialContentHandler {
    pub fn new(catalog: Arc<dyn MaterialCatalog>, content: Arc<dyn ContentStorage>) -> Self {
        Self { catalog, content }
    }

    pub async fn handle(&self, material_id: MaterialId) -> Result<ContentFile, DomainError> {
        let material = self
            .catalog
            .find(material_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::MaterialNotFound,
                    format!("Material not found: {}", material_id),
                )
            })?;

        self.content
            .fetch(&material.content_ref)
            .await?
            .ok_or_else(|| {
                // A catalog entry pointing at missing content is a storage
                // problem, not a user-facing 404.
                DomainError::storage(format!(
                    "content reference '{}' for material {} resolves to nothing",
                    material.content_ref, material_id
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::catalog::InMemoryMaterialCatalog;
    use crate::domain::foundation::Money;
    use crate::ports::MaterialRecord;
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    struct StubContent {
        files: Vec<(String, ContentFile)>,
    }

    #[async_trait]
    impl ContentStorage for StubContent {
        async fn fetch(&self, content_ref: &str) -> Result<Option<ContentFile>, DomainError> {
            Ok(self
                .files
                .iter()
                .find(|(r, _)| r == content_ref)
                .map(|(_, f)| f.clone()))
        }
    }

    fn material(content_ref: &str) -> MaterialRecord {
        MaterialRecord {
            id: MaterialId::new(),
            title: "Calculus Notes".to_string(),
            price: Money::new(Decimal::from(20), "usd").unwrap(),
            content_ref: content_ref.to_string(),
        }
    }

    #[tokio::test]
    async fn returns_content_for_known_material() {
        let record = material("calc.pdf");
        let id = record.id;
        let catalog = Arc::new(InMemoryMaterialCatalog::with_materials(vec![record]));
        let content = Arc::new(StubContent {
            files: vec![(
                "calc.pdf".to_string(),
                ContentFile {
                    filename: "calc.pdf".to_string(),
                    content_type: "application/pdf".to_string(),
                    bytes: b"%PDF-1.4".to_vec(),
                },
            )],
        });

        let file = GetMaterialContentHandler::new(catalog, content)
            .handle(id)
            .await
            .unwrap();

        assert_eq!(file.filename, "calc.pdf");
        assert!(file.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn unknown_material_is_not_found() {
        let catalog = Arc::new(InMemoryMaterialCatalog::with_materials(vec![]));
        let content = Arc::new(StubContent { files: vec![] });

        let result = GetMaterialContentHandler::new(catalog, content)
            .handle(MaterialId::new())
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::MaterialNotFound);
    }

    #[tokio::test]
    async fn dangling_content_ref_is_a_storage_error() {
        let record = material("gone.pdf");
        let id = record.id;
        let catalog = Arc::new(InMemoryMaterialCatalog::with_materials(vec![record]));
        let content = Arc::new(StubContent { files: vec![] });

        let result = GetMaterialContentHandler::new(catalog, content)
            .handle(id)
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::StorageError);
    }
}
