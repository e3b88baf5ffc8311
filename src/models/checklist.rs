//! Checklist aggregate model matching the frontend Checklist interface.

use serde::{Deserialize, Serialize};

use super::MaterialItem;

/// Conformance status of a scaffold inspection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ConformanceStatus {
    Conforme,
    #[serde(rename = "Não Conforme")]
    NaoConforme,
}

impl ConformanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConformanceStatus::Conforme => "Conforme",
            ConformanceStatus::NaoConforme => "Não Conforme",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Conforme" => Some(ConformanceStatus::Conforme),
            "Não Conforme" => Some(ConformanceStatus::NaoConforme),
            _ => None,
        }
    }
}

/// Flat form data of a scaffold service-order checklist.
///
/// `num_andaime` mirrors the checklist id and is always overwritten by the
/// server with the stored id; clients cannot renumber a checklist through it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormData {
    pub empresa: String,
    pub num_os: String,
    pub solicitante: String,
    #[serde(default)]
    pub telefone_solicitante: String,
    pub cliente: String,
    pub obra: String,
    pub local_instalacao: String,
    #[serde(default)]
    pub setor: String,
    pub tipo_servico: String,
    #[serde(default)]
    pub tipo_andaime: String,
    pub equipe: String,
    pub encarregado: String,
    #[serde(default)]
    pub responsavel_tecnico: String,
    #[serde(default)]
    pub num_art: String,
    #[serde(default)]
    pub centro_custo: String,
    #[serde(default)]
    pub turno: String,
    #[serde(default)]
    pub comprimento: String,
    #[serde(default)]
    pub largura: String,
    #[serde(default)]
    pub altura: String,
    #[serde(default)]
    pub qtd_torres: String,
    #[serde(default)]
    pub data_montagem: String,
    #[serde(default)]
    pub data_desmontagem: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub observacoes: String,
    #[serde(default)]
    pub num_andaime: String,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FormData {
    /// Validate the form, returning one entry per failing field.
    ///
    /// An empty result means the form may be written to the store; validation
    /// always runs before any store call.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let required: &[(&'static str, &str)] = &[
            ("empresa", &self.empresa),
            ("numOs", &self.num_os),
            ("solicitante", &self.solicitante),
            ("cliente", &self.cliente),
            ("obra", &self.obra),
            ("localInstalacao", &self.local_instalacao),
            ("tipoServico", &self.tipo_servico),
            ("equipe", &self.equipe),
            ("encarregado", &self.encarregado),
        ];
        for &(field, value) in required {
            if value.trim().is_empty() {
                errors.push(FieldError {
                    field,
                    message: "Campo obrigatório".to_string(),
                });
            }
        }

        let numeric: &[(&'static str, &str)] = &[
            ("comprimento", &self.comprimento),
            ("largura", &self.largura),
            ("altura", &self.altura),
            ("qtdTorres", &self.qtd_torres),
        ];
        for &(field, value) in numeric {
            if !value.trim().is_empty() && super::parse_decimal(value).is_none() {
                errors.push(FieldError {
                    field,
                    message: "Valor numérico inválido".to_string(),
                });
            }
        }

        errors
    }
}

/// A scaffold inspection checklist, the aggregate root.
///
/// `id` is the zero-padded sequential "andaime" number, unique within a
/// project; it doubles as the human-facing number and the storage key, and
/// never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    pub id: String,
    pub project_id: String,
    pub status: ConformanceStatus,
    /// Name of the person who last saved, denormalized from the form.
    pub responsible: String,
    /// RFC3339 timestamp of the most recent write.
    pub created_or_modified_at: String,
    pub form_data: FormData,
    pub materials: Vec<MaterialItem>,
}

/// Request body for creating a new checklist.
///
/// The id is never client-supplied; the sequence allocator assigns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateChecklistRequest {
    pub form_data: FormData,
    #[serde(default)]
    pub materials: Vec<MaterialItem>,
}

/// Request body for editing an existing checklist.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateChecklistRequest {
    pub form_data: FormData,
    #[serde(default)]
    pub materials: Vec<MaterialItem>,
    /// New conformance status; absent leaves the stored value unchanged.
    #[serde(default)]
    pub status: Option<ConformanceStatus>,
    /// `createdOrModifiedAt` read at form-load time. Only consulted when the
    /// server runs the reject-stale conflict policy.
    #[serde(default)]
    pub expected_modified_at: Option<String>,
}

/// Checklist plus the derived linear-meter total, as rendered by detail views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistDetail {
    #[serde(flatten)]
    pub checklist: Checklist,
    pub total_metros_lineares: f64,
}

impl ChecklistDetail {
    pub fn new(checklist: Checklist) -> Self {
        let total_metros_lineares = super::total_linear_meters(&checklist.materials);
        Self {
            checklist,
            total_metros_lineares,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> FormData {
        serde_json::from_value(serde_json::json!({
            "empresa": "Andaimes Sul",
            "numOs": "OS-1042",
            "solicitante": "Carlos",
            "cliente": "Construtora Alfa",
            "obra": "Torre Norte",
            "localInstalacao": "Fachada leste",
            "tipoServico": "Montagem",
            "equipe": "Equipe 3",
            "encarregado": "Mariana",
            "comprimento": "12,5",
            "largura": "1,2",
            "altura": "8",
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(valid_form().validate().is_empty());
    }

    #[test]
    fn test_missing_required_fields_reported() {
        let mut form = valid_form();
        form.empresa = String::new();
        form.equipe = "   ".to_string();

        let errors = form.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["empresa", "equipe"]);
    }

    #[test]
    fn test_non_numeric_dimension_rejected() {
        let mut form = valid_form();
        form.altura = "oito".to_string();

        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "altura");
    }

    #[test]
    fn test_empty_dimension_allowed() {
        let mut form = valid_form();
        form.comprimento = String::new();
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            ConformanceStatus::from_str("Não Conforme"),
            Some(ConformanceStatus::NaoConforme)
        );
        assert_eq!(ConformanceStatus::NaoConforme.as_str(), "Não Conforme");
        assert_eq!(ConformanceStatus::from_str("invalid"), None);
    }

    #[test]
    fn test_unknown_form_field_rejected() {
        let result: Result<FormData, _> = serde_json::from_value(serde_json::json!({
            "empresa": "X", "numOs": "1", "solicitante": "a", "cliente": "b",
            "obra": "c", "localInstalacao": "d", "tipoServico": "e",
            "equipe": "f", "encarregado": "g", "extraField": "nope",
        }));
        assert!(result.is_err());
    }
}
