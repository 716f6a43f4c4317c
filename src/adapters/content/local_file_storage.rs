//! Local filesystem content storage.
//!
//! Resolves content references to files under a configured root directory.
//! References containing path separators or parent components are rejected
//! before touching the filesystem: a reference is a filename, not a path.
//! The store serves PDFs; that is the only content type materials carry.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{ContentFile, ContentStorage};

/// Filesystem-backed content storage.
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create a store serving files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Validate a content reference and resolve it under the root.
    ///
    /// Returns `None` for references that try to escape the root or that
    /// are not plain filenames.
    fn resolve(&self, content_ref: &str) -> Option<PathBuf> {
        if content_ref.is_empty() || content_ref.contains("..") {
            return None;
        }
        let candidate = Path::new(content_ref);
        // A reference must be a bare filename.
        if candidate.components().count() != 1 {
            return None;
        }
        Some(self.root.join(candidate))
    }
}

#[async_trait]
impl ContentStorage for LocalFileStorage {
    async fn fetch(&self, content_ref: &str) -> Result<Option<ContentFile>, DomainError> {
        let path = match self.resolve(content_ref) {
            Some(path) => path,
            None => {
                tracing::warn!(content_ref, "rejected suspicious content reference");
                return Ok(None);
            }
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(ContentFile {
                filename: content_ref.to_string(),
                content_type: "application/pdf".to_string(),
                bytes,
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::storage(format!(
                "failed to read '{}': {}",
                content_ref, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("notes.pdf"), b"%PDF-1.4 content")
            .await
            .unwrap();
        let storage = LocalFileStorage::new(dir.path());

        let file = storage.fetch("notes.pdf").await.unwrap().unwrap();

        assert_eq!(file.filename, "notes.pdf");
        assert_eq!(file.content_type, "application/pdf");
        assert!(file.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn fetch_returns_none_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());

        assert!(storage.fetch("missing.pdf").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn traversal_references_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("notes.pdf"), b"data")
            .await
            .unwrap();
        let storage = LocalFileStorage::new(dir.path().join("sub"));

        for reference in ["../notes.pdf", "a/../../notes.pdf", "/etc/passwd", ""] {
            assert!(
                storage.fetch(reference).await.unwrap().is_none(),
                "expected '{}' to be rejected",
                reference
            );
        }
    }
}
