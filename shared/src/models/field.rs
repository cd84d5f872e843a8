//! Field (plot) identification record

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identification of the sugarcane field under inspection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct FieldRecord {
    /// Estate name (Hacienda)
    #[validate(length(max = 120))]
    #[serde(default)]
    pub farm: String,
    /// Field block within the estate (Suerte)
    #[validate(length(max = 120))]
    #[serde(default)]
    pub plot: String,
    #[validate(length(max = 120))]
    #[serde(default)]
    pub variety: String,
    #[serde(default)]
    pub planting_date: Option<NaiveDate>,
    #[serde(default)]
    pub cut_date: Option<NaiveDate>,
    #[serde(default)]
    pub cut_age_months: u32,
    #[serde(default)]
    pub cut_number: u32,
    #[validate(length(max = 120))]
    #[serde(default)]
    pub evaluator: String,
    #[serde(default)]
    pub evaluation_date: Option<NaiveDate>,
}

impl FieldRecord {
    /// Column labels, in report order
    pub const LABELS: [&'static str; 9] = [
        "Hacienda",
        "Suerte",
        "Variedad",
        "Fecha de siembra",
        "Fecha de corte",
        "Edad de corte (meses)",
        "Número de corte",
        "Evaluador",
        "Fecha de evaluación",
    ];

    /// Field values rendered as text, aligned with [`FieldRecord::LABELS`]
    pub fn values(&self) -> [String; 9] {
        [
            self.farm.clone(),
            self.plot.clone(),
            self.variety.clone(),
            format_date(self.planting_date),
            format_date(self.cut_date),
            self.cut_age_months.to_string(),
            self.cut_number.to_string(),
            self.evaluator.clone(),
            format_date(self.evaluation_date),
        ]
    }

    /// Label/value pairs in report order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        Self::LABELS.iter().copied().zip(self.values()).collect()
    }
}

/// ISO date, or blank when the date was not captured
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
