//! Immutable checklist version snapshots.

use serde::{Deserialize, Serialize};

use super::{FormData, MaterialItem};

/// The state of a checklist immediately before one edit.
///
/// Versions are write-once: the edit batch creates them and nothing in the
/// normal flow mutates or deletes them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistVersion {
    /// Opaque record id; ordering is carried by `saved_at`, not by this id.
    pub id: String,
    pub project_id: String,
    pub checklist_id: String,
    /// RFC3339 timestamp of the edit that triggered the snapshot.
    pub saved_at: String,
    /// Display name of the editing user.
    pub saved_by: String,
    pub form_data: FormData,
    pub materials: Vec<MaterialItem>,
}

/// One row of the version history listing.
///
/// The ordinal ("Versão #N") is computed from list position, never stored:
/// the newest entry carries the highest number.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub id: String,
    pub ordinal: usize,
    pub saved_at: String,
    pub saved_by: String,
}

/// Version history of a checklist, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistory {
    pub total: usize,
    pub versions: Vec<VersionSummary>,
}

impl VersionHistory {
    /// Build the listing from versions already ordered by `saved_at`
    /// descending. Ordinal = total − index, so the oldest entry is "#1".
    pub fn from_versions(versions: &[ChecklistVersion]) -> Self {
        let total = versions.len();
        Self {
            total,
            versions: versions
                .iter()
                .enumerate()
                .map(|(index, v)| VersionSummary {
                    id: v.id.clone(),
                    ordinal: total - index,
                    saved_at: v.saved_at.clone(),
                    saved_by: v.saved_by.clone(),
                })
                .collect(),
        }
    }
}

/// Full frozen snapshot plus the derived total, as rendered read-only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDetail {
    #[serde(flatten)]
    pub version: ChecklistVersion,
    pub total_metros_lineares: f64,
}

impl VersionDetail {
    pub fn new(version: ChecklistVersion) -> Self {
        let total_metros_lineares = super::total_linear_meters(&version.materials);
        Self {
            version,
            total_metros_lineares,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(id: &str, saved_at: &str) -> ChecklistVersion {
        ChecklistVersion {
            id: id.to_string(),
            project_id: "construtora-alfa".to_string(),
            checklist_id: "00001".to_string(),
            saved_at: saved_at.to_string(),
            saved_by: "Mariana".to_string(),
            form_data: serde_json::from_value(serde_json::json!({
                "empresa": "Andaimes Sul", "numOs": "OS-1", "solicitante": "a",
                "cliente": "b", "obra": "c", "localInstalacao": "d",
                "tipoServico": "e", "equipe": "f", "encarregado": "g",
            }))
            .unwrap(),
            materials: Vec::new(),
        }
    }

    #[test]
    fn test_ordinals_count_down_from_newest() {
        // Input is newest-first, as the repository returns it.
        let versions = vec![
            version("v3", "2026-03-03T10:00:00Z"),
            version("v2", "2026-03-02T10:00:00Z"),
            version("v1", "2026-03-01T10:00:00Z"),
        ];
        let history = VersionHistory::from_versions(&versions);

        assert_eq!(history.total, 3);
        let ordinals: Vec<usize> = history.versions.iter().map(|v| v.ordinal).collect();
        assert_eq!(ordinals, vec![3, 2, 1]);
        assert_eq!(history.versions[0].id, "v3");
        assert_eq!(history.versions[2].id, "v1");
    }

    #[test]
    fn test_empty_history_is_valid() {
        let history = VersionHistory::from_versions(&[]);
        assert_eq!(history.total, 0);
        assert!(history.versions.is_empty());
    }
}
