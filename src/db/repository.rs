//! Database repository for checklist and version operations.
//!
//! The edit path runs as a single transaction so the version snapshot and the
//! checklist overwrite commit together or not at all.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::config::EditConflictPolicy;
use crate::errors::AppError;
use crate::models::{
    Checklist, ChecklistVersion, ConformanceStatus, CreateChecklistRequest, FieldError,
    UpdateChecklistRequest,
};

/// Width of the zero-padded checklist number.
const CHECKLIST_NUMBER_WIDTH: usize = 5;

/// Database repository for all checklist data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== SEQUENCE ALLOCATOR ====================

    /// Next checklist number for a project: live count + 1, zero-padded.
    ///
    /// Count-based on purpose — numbers freed by deletion are never reused,
    /// and a concurrent creation racing this count is caught by the
    /// duplicate check on insert, not here.
    pub async fn next_checklist_number(&self, project_id: &str) -> Result<String, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM checklists WHERE project_id = ?")
            .bind(project_id)
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.get("total");
        Ok(format_checklist_number(count + 1))
    }

    // ==================== CHECKLIST OPERATIONS ====================

    /// List all checklists under a project, ordered by number.
    pub async fn list_checklists(&self, project_id: &str) -> Result<Vec<Checklist>, AppError> {
        let rows = sqlx::query(
            "SELECT project_id, id, status, responsible, created_or_modified_at, form_data, materials \
             FROM checklists WHERE project_id = ? ORDER BY id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(checklist_from_row).collect()
    }

    /// Get a checklist by number.
    pub async fn get_checklist(
        &self,
        project_id: &str,
        id: &str,
    ) -> Result<Option<Checklist>, AppError> {
        let row = sqlx::query(
            "SELECT project_id, id, status, responsible, created_or_modified_at, form_data, materials \
             FROM checklists WHERE project_id = ? AND id = ?",
        )
        .bind(project_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(checklist_from_row).transpose()
    }

    /// Create a new checklist under the allocated number.
    ///
    /// If another writer won the race for the same number, the create fails
    /// with `DuplicateIdentifier` and writes nothing; the caller retries by
    /// resubmitting, which re-runs the allocator.
    pub async fn create_checklist(
        &self,
        project_id: &str,
        request: &CreateChecklistRequest,
    ) -> Result<Checklist, AppError> {
        // Allocation failure aborts before any write.
        let id = self.next_checklist_number(project_id).await?;

        let existing = sqlx::query("SELECT 1 FROM checklists WHERE project_id = ? AND id = ?")
            .bind(project_id)
            .bind(&id)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::DuplicateIdentifier { checklist_id: id });
        }

        let now = Utc::now().to_rfc3339();
        let mut form_data = request.form_data.clone();
        form_data.num_andaime = id.clone();
        let responsible = form_data.encarregado.clone();
        let form_json = serde_json::to_string(&form_data)?;
        let materials_json = serde_json::to_string(&request.materials)?;

        let result = sqlx::query(
            "INSERT INTO checklists (project_id, id, status, responsible, created_or_modified_at, form_data, materials) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(project_id)
        .bind(&id)
        .bind(ConformanceStatus::Conforme.as_str())
        .bind(&responsible)
        .bind(&now)
        .bind(&form_json)
        .bind(&materials_json)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {}
            // Two writers passed the existence check with the same number;
            // the primary key decides, the loser gets the expected conflict.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(AppError::DuplicateIdentifier { checklist_id: id });
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Checklist {
            id,
            project_id: project_id.to_string(),
            status: ConformanceStatus::Conforme,
            responsible,
            created_or_modified_at: now,
            form_data,
            materials: request.materials.clone(),
        })
    }

    /// Apply an edit, snapshotting the pre-edit state as a new version.
    ///
    /// Runs as one transaction: read current state, insert the version row
    /// holding that state, overwrite the checklist row. A failure anywhere
    /// rolls the whole batch back, so no observer ever sees the version
    /// without the update or the update without the version.
    pub async fn update_checklist(
        &self,
        project_id: &str,
        id: &str,
        request: &UpdateChecklistRequest,
        saved_by: &str,
        policy: EditConflictPolicy,
    ) -> Result<Checklist, AppError> {
        let expected = match policy {
            EditConflictPolicy::LastWriteWins => None,
            EditConflictPolicy::RejectStale => Some(
                request
                    .expected_modified_at
                    .clone()
                    .ok_or_else(|| {
                        AppError::Validation(vec![FieldError {
                            field: "expectedModifiedAt",
                            message: "Required under the reject-stale conflict policy"
                                .to_string(),
                        }])
                    })?,
            ),
        };

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            "SELECT project_id, id, status, responsible, created_or_modified_at, form_data, materials \
             FROM checklists WHERE project_id = ? AND id = ?",
        )
        .bind(project_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let current = row
            .as_ref()
            .map(checklist_from_row)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("Checklist {} not found", id)))?;

        let now = Utc::now().to_rfc3339();
        let version_id = uuid::Uuid::new_v4().to_string();

        // Snapshot of the state immediately before this edit.
        sqlx::query(
            "INSERT INTO checklist_versions (id, project_id, checklist_id, saved_at, saved_by, form_data, materials) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&version_id)
        .bind(project_id)
        .bind(id)
        .bind(&now)
        .bind(saved_by)
        .bind(serde_json::to_string(&current.form_data)?)
        .bind(serde_json::to_string(&current.materials)?)
        .execute(&mut *tx)
        .await?;

        let mut form_data = request.form_data.clone();
        form_data.num_andaime = id.to_string();
        let status = request.status.unwrap_or(current.status);
        let responsible = form_data.encarregado.clone();
        let form_json = serde_json::to_string(&form_data)?;
        let materials_json = serde_json::to_string(&request.materials)?;

        let update = match &expected {
            Some(token) => sqlx::query(
                "UPDATE checklists SET status = ?, responsible = ?, created_or_modified_at = ?, form_data = ?, materials = ? \
                 WHERE project_id = ? AND id = ? AND created_or_modified_at = ?",
            )
            .bind(status.as_str())
            .bind(&responsible)
            .bind(&now)
            .bind(&form_json)
            .bind(&materials_json)
            .bind(project_id)
            .bind(id)
            .bind(token),
            None => sqlx::query(
                "UPDATE checklists SET status = ?, responsible = ?, created_or_modified_at = ?, form_data = ?, materials = ? \
                 WHERE project_id = ? AND id = ?",
            )
            .bind(status.as_str())
            .bind(&responsible)
            .bind(&now)
            .bind(&form_json)
            .bind(&materials_json)
            .bind(project_id)
            .bind(id),
        };

        let result = update.execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            // Stale token: dropping the transaction rolls the snapshot back.
            return Err(AppError::EditConflict {
                current_modified_at: current.created_or_modified_at,
            });
        }

        tx.commit().await?;

        Ok(Checklist {
            id: id.to_string(),
            project_id: project_id.to_string(),
            status,
            responsible,
            created_or_modified_at: now,
            form_data,
            materials: request.materials.clone(),
        })
    }

    /// Administrative delete of a checklist and its version history.
    ///
    /// Surviving checklists are never renumbered; the freed number is not
    /// reused by the allocator.
    pub async fn delete_checklist(&self, project_id: &str, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM checklists WHERE project_id = ? AND id = ?")
            .bind(project_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Checklist {} not found", id)));
        }

        sqlx::query("DELETE FROM checklist_versions WHERE project_id = ? AND checklist_id = ?")
            .bind(project_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    // ==================== VERSION OPERATIONS ====================

    /// List all versions of a checklist, most recent first.
    ///
    /// An empty list is the normal state of a never-edited checklist.
    pub async fn list_versions(
        &self,
        project_id: &str,
        checklist_id: &str,
    ) -> Result<Vec<ChecklistVersion>, AppError> {
        let rows = sqlx::query(
            "SELECT id, project_id, checklist_id, saved_at, saved_by, form_data, materials \
             FROM checklist_versions WHERE project_id = ? AND checklist_id = ? \
             ORDER BY saved_at DESC",
        )
        .bind(project_id)
        .bind(checklist_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(version_from_row).collect()
    }

    /// Get a single frozen version by id.
    pub async fn get_version(
        &self,
        project_id: &str,
        checklist_id: &str,
        version_id: &str,
    ) -> Result<Option<ChecklistVersion>, AppError> {
        let row = sqlx::query(
            "SELECT id, project_id, checklist_id, saved_at, saved_by, form_data, materials \
             FROM checklist_versions WHERE project_id = ? AND checklist_id = ? AND id = ?",
        )
        .bind(project_id)
        .bind(checklist_id)
        .bind(version_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(version_from_row).transpose()
    }
}

/// Format a sequence number as the human-facing checklist id.
pub fn format_checklist_number(n: i64) -> String {
    format!("{:0width$}", n, width = CHECKLIST_NUMBER_WIDTH)
}

// Helper functions for row conversion

fn checklist_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Checklist, AppError> {
    let status_str: String = row.get("status");
    let form_json: String = row.get("form_data");
    let materials_json: String = row.get("materials");

    Ok(Checklist {
        id: row.get("id"),
        project_id: row.get("project_id"),
        status: ConformanceStatus::from_str(&status_str).ok_or_else(|| {
            AppError::Internal(format!("Unknown checklist status: {}", status_str))
        })?,
        responsible: row.get("responsible"),
        created_or_modified_at: row.get("created_or_modified_at"),
        form_data: serde_json::from_str(&form_json)?,
        materials: serde_json::from_str(&materials_json)?,
    })
}

fn version_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChecklistVersion, AppError> {
    let form_json: String = row.get("form_data");
    let materials_json: String = row.get("materials");

    Ok(ChecklistVersion {
        id: row.get("id"),
        project_id: row.get("project_id"),
        checklist_id: row.get("checklist_id"),
        saved_at: row.get("saved_at"),
        saved_by: row.get("saved_by"),
        form_data: serde_json::from_str(&form_json)?,
        materials: serde_json::from_str(&materials_json)?,
    })
}
