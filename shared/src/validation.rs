//! Validation utilities for inspection input
//!
//! Sample counts are rejected rather than clamped: a stalk with more bored
//! internodes than inspected ones is a data-entry mistake. Field record text
//! limits live on `FieldRecord` as `validator` attributes.

// ============================================================================
// Sampling Validations
// ============================================================================

/// Validate one stalk's internode counts
pub fn validate_stalk_counts(total_internodes: u32, damaged_internodes: u32) -> Result<(), &'static str> {
    if total_internodes < 1 {
        return Err("Total internodes must be at least 1");
    }
    if damaged_internodes > total_internodes {
        return Err("Bored internodes cannot exceed total internodes");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_fully_bored_stalk() {
        assert!(validate_stalk_counts(5, 5).is_ok());
    }

    #[test]
    fn rejects_zero_internodes() {
        assert!(validate_stalk_counts(0, 0).is_err());
    }

    #[test]
    fn rejects_more_damaged_than_total() {
        assert_eq!(
            validate_stalk_counts(3, 4),
            Err("Bored internodes cannot exceed total internodes")
        );
    }
}
