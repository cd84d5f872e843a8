//! Tests for infestation severity classification
//! Verifies tier boundaries and recommended control actions

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{classify_infestation, ClassificationResult, InfestationTier, Language};

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

// =============================================================================
// Tier Boundary Tests
// =============================================================================

mod tier_boundaries {
    use super::*;

    #[test]
    fn zero_index_is_healthy() {
        assert_eq!(classify_infestation(Decimal::ZERO), InfestationTier::Sano);
    }

    #[test]
    fn just_below_four_is_healthy() {
        assert_eq!(classify_infestation(dec("3.999")), InfestationTier::Sano);
    }

    #[test]
    fn four_is_damaged() {
        // Closed lower bound
        assert_eq!(classify_infestation(dec("4.0")), InfestationTier::Danado);
    }

    #[test]
    fn ten_is_damaged() {
        // Closed upper bound
        assert_eq!(classify_infestation(dec("10.0")), InfestationTier::Danado);
    }

    #[test]
    fn just_above_ten_is_severely_damaged() {
        assert_eq!(classify_infestation(dec("10.001")), InfestationTier::MuyDanado);
    }

    #[test]
    fn fully_bored_is_severely_damaged() {
        assert_eq!(classify_infestation(dec("100")), InfestationTier::MuyDanado);
    }
}

// =============================================================================
// Label and Recommendation Tests
// =============================================================================

mod labels {
    use super::*;

    #[test]
    fn tier_labels() {
        assert_eq!(InfestationTier::Sano.label(), "SANO");
        assert_eq!(InfestationTier::Danado.label(), "DAÑADO");
        assert_eq!(InfestationTier::MuyDanado.label(), "MUY DAÑADO");
        assert_eq!(format!("{}", InfestationTier::MuyDanado), "MUY DAÑADO");
    }

    #[test]
    fn english_recommendations() {
        assert_eq!(
            InfestationTier::Sano.recommendation(Language::English),
            "15 fly pairs / ha — month 7"
        );
        assert_eq!(
            InfestationTier::Danado.recommendation(Language::English),
            "15 fly pairs / ha — months 5 and 7; 50 wasp inches / ha — month 7"
        );
        assert_eq!(
            InfestationTier::MuyDanado.recommendation(Language::English),
            "15 fly pairs / ha — months 5, 7, 9; 50 wasp inches / ha — months 5 and 7"
        );
    }

    #[test]
    fn spanish_is_default_language() {
        assert_eq!(Language::default(), Language::Spanish);
        assert_eq!(
            InfestationTier::Sano.recommendation(Language::default()),
            "15 Parejas de moscas / Ha - 7 meses"
        );
    }

    #[test]
    fn classification_result_carries_tier_and_text() {
        let result = ClassificationResult::new(dec("7.5"), Language::Spanish);
        assert_eq!(result.tier, InfestationTier::Danado);
        assert_eq!(result.tier_label, "DAÑADO");
        assert_eq!(
            result.recommendation,
            "15 Parejas de moscas / Ha - 5 y 7 meses, 50 Pulg de avispas / Ha - 7 meses"
        );
    }

    #[test]
    fn language_codes() {
        assert_eq!(Language::from_code("en"), Language::English);
        assert_eq!(Language::from_code("ES"), Language::Spanish);
        assert_eq!(Language::from_code("fr"), Language::Spanish);
    }
}

// =============================================================================
// Classifier Properties
// =============================================================================

/// Strategy for infestation indexes with three decimals (0.000% to 100.000%)
fn index_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000i64).prop_map(|n| Decimal::new(n, 3))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every index maps to the tier its range prescribes
    #[test]
    fn prop_tier_matches_range(ii in index_strategy()) {
        let expected = if ii < dec("4") {
            InfestationTier::Sano
        } else if ii <= dec("10") {
            InfestationTier::Danado
        } else {
            InfestationTier::MuyDanado
        };
        prop_assert_eq!(classify_infestation(ii), expected);
    }

    /// Severity never decreases as the index grows
    #[test]
    fn prop_classification_is_monotonic(a in index_strategy(), b in index_strategy()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let rank = |tier: InfestationTier| match tier {
            InfestationTier::Sano => 0,
            InfestationTier::Danado => 1,
            InfestationTier::MuyDanado => 2,
        };
        prop_assert!(rank(classify_infestation(low)) <= rank(classify_infestation(high)));
    }
}
