//! Checklist API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::auth::Identity;
use crate::errors::AppError;
use crate::models::{Checklist, ChecklistDetail, CreateChecklistRequest, UpdateChecklistRequest};
use crate::AppState;

/// GET /api/projects/:project/checklists - List all checklists of a project.
pub async fn list_checklists(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> ApiResult<Vec<Checklist>> {
    let checklists = state.repo.list_checklists(&project_id).await?;
    success(checklists)
}

/// GET /api/projects/:project/checklists/:id - Get a single checklist.
pub async fn get_checklist(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(String, String)>,
) -> ApiResult<ChecklistDetail> {
    match state.repo.get_checklist(&project_id, &id).await? {
        Some(checklist) => success(ChecklistDetail::new(checklist)),
        None => Err(AppError::NotFound(format!("Checklist {} not found", id))),
    }
}

/// POST /api/projects/:project/checklists - Create a new checklist.
///
/// The id is assigned by the sequence allocator; a `DUPLICATE_IDENTIFIER`
/// response means a concurrent creation took the number and the client
/// should simply resubmit.
pub async fn create_checklist(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(request): Json<CreateChecklistRequest>,
) -> ApiResult<Checklist> {
    let field_errors = request.form_data.validate();
    if !field_errors.is_empty() {
        return Err(AppError::Validation(field_errors));
    }

    let checklist = state.repo.create_checklist(&project_id, &request).await?;
    tracing::info!(
        project = %project_id,
        checklist = %checklist.id,
        "Checklist created"
    );
    success(checklist)
}

/// PUT /api/projects/:project/checklists/:id - Edit a checklist.
///
/// Every successful save snapshots the prior state as a new version stamped
/// with the acting user's display name.
pub async fn update_checklist(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(String, String)>,
    identity: Identity,
    Json(request): Json<UpdateChecklistRequest>,
) -> ApiResult<Checklist> {
    let field_errors = request.form_data.validate();
    if !field_errors.is_empty() {
        return Err(AppError::Validation(field_errors));
    }

    let checklist = state
        .repo
        .update_checklist(
            &project_id,
            &id,
            &request,
            &identity.display_name,
            state.config.edit_conflict_policy,
        )
        .await?;
    tracing::info!(
        project = %project_id,
        checklist = %id,
        saved_by = %identity.display_name,
        "Checklist updated"
    );
    success(checklist)
}

/// DELETE /api/projects/:project/checklists/:id - Administratively delete a checklist.
pub async fn delete_checklist(
    State(state): State<AppState>,
    Path((project_id, id)): Path<(String, String)>,
) -> ApiResult<()> {
    state.repo.delete_checklist(&project_id, &id).await?;
    tracing::info!(project = %project_id, checklist = %id, "Checklist deleted");
    success(())
}
