//! Content storage port.
//!
//! Resolves a material's opaque content reference to its file bytes. Blob
//! storage itself is an external collaborator; the core only fetches.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for fetching material content.
#[async_trait]
pub trait ContentStorage: Send + Sync {
    /// Fetch the content behind a reference. Returns `None` if the reference
    /// resolves to nothing.
    async fn fetch(&self, content_ref: &str) -> Result<Option<ContentFile>, DomainError>;
}

/// A fetched content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    /// File name to suggest to the client.
    pub filename: String,

    /// MIME type of the content.
    pub content_type: String,

    /// The raw bytes.
    pub bytes: Vec<u8>,
}
