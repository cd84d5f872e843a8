//! WebAssembly module for the sugarcane borer inspection form
//!
//! Provides client-side computation for:
//! - Infestation index calculation
//! - Severity classification and recommended control
//! - Offline sample validation

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Sample counts as entered in the browser form
#[derive(Debug, Deserialize)]
struct SampleInput {
    total_internodes: u32,
    damaged_internodes: u32,
}

/// Aggregate and classification returned to JavaScript
#[derive(Debug, Serialize)]
struct SampleSummary {
    aggregate: AggregateResult,
    classification: ClassificationResult,
    chart: PieChartData,
}

/// Calculate the infestation index (percent) of one set of totals
#[wasm_bindgen]
pub fn calculate_infestation_index(total_internodes: u32, damaged_internodes: u32) -> f64 {
    infestation_index(u64::from(total_internodes), u64::from(damaged_internodes))
        .to_f64()
        .unwrap_or(0.0)
}

/// Convert a JavaScript index to `Decimal`. Values beyond the `Decimal`
/// range (including +inf) saturate to `Decimal::MAX`; NaN and negatives are 0.
fn index_to_decimal(index: f64) -> Decimal {
    if index.is_nan() || index <= 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64(index).unwrap_or(Decimal::MAX)
}

/// Classify an infestation index into SANO / DAÑADO / MUY DAÑADO
#[wasm_bindgen]
pub fn classify_infestation_index(index: f64) -> String {
    classify_infestation(index_to_decimal(index)).label().to_string()
}

/// Recommended biological control for an index ("es" or "en")
#[wasm_bindgen]
pub fn recommended_control(index: f64, lang: &str) -> String {
    classify_infestation(index_to_decimal(index))
        .recommendation(Language::from_code(lang))
        .to_string()
}

/// Check one stalk's counts before adding it
#[wasm_bindgen]
pub fn validate_stalk_sample(total_internodes: u32, damaged_internodes: u32) -> bool {
    validate_stalk_counts(total_internodes, damaged_internodes).is_ok()
}

/// Aggregate a JSON array of `{total_internodes, damaged_internodes}`
#[wasm_bindgen]
pub fn aggregate_samples(samples_json: &str, lang: &str) -> Result<String, JsValue> {
    let inputs: Vec<SampleInput> = serde_json::from_str(samples_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid samples JSON: {}", e)))?;

    let mut samples = SampleSet::new();
    for input in &inputs {
        validate_stalk_counts(input.total_internodes, input.damaged_internodes)
            .map_err(JsValue::from_str)?;
        samples.append(input.total_internodes, input.damaged_internodes);
    }

    let aggregate = samples.aggregate();
    let summary = SampleSummary {
        classification: ClassificationResult::new(
            aggregate.infestation_index,
            Language::from_code(lang),
        ),
        chart: PieChartData::from_aggregate(&aggregate),
        aggregate,
    };

    serde_json::to_string(&summary)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infestation_index() {
        assert!((calculate_infestation_index(20, 1) - 5.0).abs() < 0.001);
        assert_eq!(calculate_infestation_index(0, 0), 0.0);
    }

    #[test]
    fn test_classify_infestation_index() {
        assert_eq!(classify_infestation_index(3.999), "SANO");
        assert_eq!(classify_infestation_index(4.0), "DAÑADO");
        assert_eq!(classify_infestation_index(10.0), "DAÑADO");
        assert_eq!(classify_infestation_index(10.001), "MUY DAÑADO");
    }

    #[test]
    fn test_classify_out_of_decimal_range() {
        assert_eq!(classify_infestation_index(1e30), "MUY DAÑADO");
        assert_eq!(classify_infestation_index(f64::INFINITY), "MUY DAÑADO");
        assert_eq!(classify_infestation_index(f64::NAN), "SANO");
        assert_eq!(
            recommended_control(1e30, "en"),
            "15 fly pairs / ha — months 5, 7, 9; 50 wasp inches / ha — months 5 and 7"
        );
    }

    #[test]
    fn test_recommended_control() {
        assert_eq!(recommended_control(1.0, "en"), "15 fly pairs / ha — month 7");
        assert_eq!(
            recommended_control(1.0, "es"),
            "15 Parejas de moscas / Ha - 7 meses"
        );
    }

    #[test]
    fn test_validate_stalk_sample() {
        assert!(validate_stalk_sample(10, 10));
        assert!(!validate_stalk_sample(10, 11));
        assert!(!validate_stalk_sample(0, 0));
    }

    #[test]
    fn test_aggregate_samples() {
        let json = r#"[{"total_internodes":10,"damaged_internodes":0},{"total_internodes":10,"damaged_internodes":1}]"#;
        let summary: serde_json::Value =
            serde_json::from_str(&aggregate_samples(json, "es").unwrap()).unwrap();
        assert_eq!(summary["aggregate"]["total_internodes"], 20);
        assert_eq!(summary["classification"]["tier_label"], "DAÑADO");
    }
}
