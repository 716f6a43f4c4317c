//! Content storage configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Filesystem content storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding material content files.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,
}

fn default_content_dir() -> String {
    "./content".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.content_dir.is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE_CONTENT_DIR"));
        }
        Ok(())
    }
}
