//! Material line items and the derived linear-meter total.

use serde::{Deserialize, Serialize};

/// One material line of a checklist.
///
/// Quantities are numeric text as typed in the form, with a comma as the
/// decimal separator ("1,5").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MaterialItem {
    pub tipo: String,
    #[serde(default)]
    pub quantidade: String,
    #[serde(default)]
    pub metro_linear_unitario: String,
}

/// Parse locale-formatted numeric text (comma decimal separator).
///
/// Returns `None` for empty or unparseable input.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok()
}

/// Sum of quantity × linear meters per unit over all lines.
///
/// Unparseable or empty fields count as zero; this fold never fails, so the
/// same total can be recomputed wherever materials are displayed.
pub fn total_linear_meters(materials: &[MaterialItem]) -> f64 {
    let total: f64 = materials
        .iter()
        .map(|item| {
            let quantity = parse_decimal(&item.quantidade).unwrap_or(0.0);
            let per_unit = parse_decimal(&item.metro_linear_unitario).unwrap_or(0.0);
            quantity * per_unit
        })
        .sum();
    round2(total)
}

/// Round to two decimal places for display.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
