//! Infestation severity classification

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Language;

/// Lower bound (inclusive) of the damaged tier, in percent
pub const DAMAGED_THRESHOLD: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

/// Upper bound (inclusive) of the damaged tier, in percent
pub const SEVERE_THRESHOLD: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Crop severity tier derived from the infestation index
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InfestationTier {
    /// I.I. below 4%
    Sano,
    /// I.I. from 4% to 10%, both inclusive
    Danado,
    /// I.I. above 10%
    MuyDanado,
}

impl InfestationTier {
    /// Label printed on reports
    pub fn label(&self) -> &'static str {
        match self {
            InfestationTier::Sano => "SANO",
            InfestationTier::Danado => "DAÑADO",
            InfestationTier::MuyDanado => "MUY DAÑADO",
        }
    }

    /// Recommended biological control (Lixophaga flies, Cotesia wasps)
    pub fn recommendation(&self, language: Language) -> &'static str {
        match (self, language) {
            (InfestationTier::Sano, Language::Spanish) => "15 Parejas de moscas / Ha - 7 meses",
            (InfestationTier::Sano, Language::English) => "15 fly pairs / ha — month 7",
            (InfestationTier::Danado, Language::Spanish) => {
                "15 Parejas de moscas / Ha - 5 y 7 meses, 50 Pulg de avispas / Ha - 7 meses"
            }
            (InfestationTier::Danado, Language::English) => {
                "15 fly pairs / ha — months 5 and 7; 50 wasp inches / ha — month 7"
            }
            (InfestationTier::MuyDanado, Language::Spanish) => {
                "15 Parejas de moscas / Ha - 5, 7 y 9 meses, 50 Pulg de avispas / Ha - 5 y 7 meses"
            }
            (InfestationTier::MuyDanado, Language::English) => {
                "15 fly pairs / ha — months 5, 7, 9; 50 wasp inches / ha — months 5 and 7"
            }
        }
    }
}

impl std::fmt::Display for InfestationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tier and recommended action for an infestation index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassificationResult {
    pub infestation_index: Decimal,
    pub tier: InfestationTier,
    pub tier_label: String,
    pub recommendation: String,
}

/// Classify an infestation index (percent).
///
/// `ii < 4` is SANO, `4 <= ii <= 10` is DAÑADO, `ii > 10` is MUY DAÑADO.
pub fn classify_infestation(infestation_index: Decimal) -> InfestationTier {
    if infestation_index < DAMAGED_THRESHOLD {
        InfestationTier::Sano
    } else if infestation_index <= SEVERE_THRESHOLD {
        InfestationTier::Danado
    } else {
        InfestationTier::MuyDanado
    }
}

impl ClassificationResult {
    pub fn new(infestation_index: Decimal, language: Language) -> Self {
        let tier = classify_infestation(infestation_index);
        Self {
            infestation_index,
            tier,
            tier_label: tier.label().to_string(),
            recommendation: tier.recommendation(language).to_string(),
        }
    }
}
