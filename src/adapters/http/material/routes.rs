//! Axum router configuration for material endpoints.

use axum::{routing::get, Router};

use super::super::AppState;
use super::handlers::{check_owned, download_content};

/// Material routes, mounted at `/api/materials`.
///
/// - `GET /:id/owned` - ownership check
/// - `GET /:id/content` - gated download
pub fn material_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/owned", get(check_owned))
        .route("/:id/content", get(download_content))
}
