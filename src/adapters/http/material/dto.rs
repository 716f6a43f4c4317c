//! HTTP DTOs for material endpoints.

use serde::Serialize;

/// Response for the ownership check.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedResponse {
    pub owned: bool,
}
