//! Version history API endpoints.

use axum::extract::{Path, State};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{VersionDetail, VersionHistory};
use crate::AppState;

/// GET /api/projects/:project/checklists/:id/versions - Version history, newest first.
///
/// A checklist with no prior versions returns an empty history, not an error.
pub async fn list_versions(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(String, String)>,
) -> ApiResult<VersionHistory> {
    if state.repo.get_checklist(&project_id, &id).await?.is_none() {
        return Err(AppError::NotFound(format!("Checklist {} not found", id)));
    }

    let versions = state.repo.list_versions(&project_id, &id).await?;
    success(VersionHistory::from_versions(&versions))
}

/// GET /api/projects/:project/checklists/:id/versions/:vid - One frozen snapshot.
pub async fn get_version(
    State(state): State<AppState>,
    Path((project_id, id, version_id)): Path<(String, String, String)>,
) -> ApiResult<VersionDetail> {
    match state
        .repo
        .get_version(&project_id, &id, &version_id)
        .await?
    {
        Some(version) => success(VersionDetail::new(version)),
        None => Err(AppError::NotFound(format!(
            "Version {} of checklist {} not found",
            version_id, id
        ))),
    }
}
