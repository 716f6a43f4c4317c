//! HTTP handlers for material endpoints.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::ProtectedAction;
use crate::domain::foundation::MaterialId;

use super::super::error::ApiError;
use super::super::middleware::OptionalAuth;
use super::super::AppState;
use super::dto::OwnedResponse;

/// `GET /api/materials/:id/owned` - does the caller own this material.
pub async fn check_owned(
    State(state): State<AppState>,
    OptionalAuth(claims): OptionalAuth,
    Path(material_id): Path<MaterialId>,
) -> Result<impl IntoResponse, ApiError> {
    let claims = state
        .gate
        .authorize(claims, &ProtectedAction::CheckOwnership)
        .await?;

    let owned = state
        .check_ownership_handler()
        .handle(claims.subject, material_id)
        .await?;

    Ok(Json(OwnedResponse { owned }))
}

/// `GET /api/materials/:id/content` - download the material.
///
/// The gate performs the live ownership read; admins bypass it. Only after
/// the gate allows does the content get touched.
pub async fn download_content(
    State(state): State<AppState>,
    OptionalAuth(claims): OptionalAuth,
    Path(material_id): Path<MaterialId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .gate
        .authorize(claims, &ProtectedAction::DownloadMaterial(material_id))
        .await?;

    let file = state
        .get_material_content_handler()
        .handle(material_id)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
    ];

    Ok((headers, file.bytes))
}
