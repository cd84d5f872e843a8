//! Stalk sampling models and the sample aggregator

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One inspected stalk
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StalkSample {
    /// 1-based position in the sample set at insertion time
    pub sequence: u32,
    pub total_internodes: u32,
    /// Bored internodes, never more than `total_internodes`
    pub damaged_internodes: u32,
}

/// Insertion-ordered stalk samples of one inspection session.
///
/// Only grows by [`SampleSet::append`] and shrinks by
/// [`SampleSet::remove_last`] or [`SampleSet::clear`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SampleSet {
    samples: Vec<StalkSample>,
}

/// Totals over a sample set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregateResult {
    pub total_internodes: u64,
    pub total_damaged: u64,
    /// Percentage of bored internodes
    pub infestation_index: Decimal,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, numbering it after the samples already present.
    ///
    /// The counts are trusted; validate them with
    /// [`crate::validation::validate_stalk_counts`] first.
    pub fn append(&mut self, total_internodes: u32, damaged_internodes: u32) -> StalkSample {
        let sample = StalkSample {
            sequence: self.samples.len() as u32 + 1,
            total_internodes,
            damaged_internodes,
        };
        self.samples.push(sample);
        sample
    }

    /// Remove the most recent sample. Returns false when the set was empty.
    pub fn remove_last(&mut self) -> bool {
        self.samples.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[StalkSample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &StalkSample> {
        self.samples.iter()
    }

    /// Sum internodes and bored internodes over all samples
    pub fn aggregate(&self) -> AggregateResult {
        let (total_internodes, total_damaged) =
            self.samples.iter().fold((0u64, 0u64), |(total, damaged), s| {
                (
                    total + u64::from(s.total_internodes),
                    damaged + u64::from(s.damaged_internodes),
                )
            });

        AggregateResult {
            total_internodes,
            total_damaged,
            infestation_index: infestation_index(total_internodes, total_damaged),
        }
    }
}

impl AggregateResult {
    pub fn empty() -> Self {
        Self {
            total_internodes: 0,
            total_damaged: 0,
            infestation_index: Decimal::ZERO,
        }
    }

    /// Internodes found without borer damage
    pub fn total_healthy(&self) -> u64 {
        self.total_internodes.saturating_sub(self.total_damaged)
    }
}

/// Infestation index = (damaged / total) × 100, or 0 when nothing was inspected
pub fn infestation_index(total_internodes: u64, total_damaged: u64) -> Decimal {
    if total_internodes == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(total_damaged) * Decimal::ONE_HUNDRED / Decimal::from(total_internodes)
}
