//! Healthy vs affected internode shares for the results pie chart

use serde::{Deserialize, Serialize};

use super::AggregateResult;

pub const HEALTHY_LABEL: &str = "Sanos";
pub const AFFECTED_LABEL: &str = "Afectados";

/// One pie slice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: u64,
    /// Share of all inspected internodes, in percent
    pub percent: f64,
}

impl PieSlice {
    /// Percentage with one decimal, e.g. `95.0%`
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

/// Two-slice pie: healthy first, affected second
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PieChartData {
    pub slices: Vec<PieSlice>,
}

impl PieChartData {
    pub fn from_aggregate(aggregate: &AggregateResult) -> Self {
        let total = aggregate.total_internodes;
        let share = |count: u64| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            }
        };

        let healthy = aggregate.total_healthy();
        let affected = aggregate.total_damaged;

        Self {
            slices: vec![
                PieSlice {
                    label: HEALTHY_LABEL.to_string(),
                    count: healthy,
                    percent: share(healthy),
                },
                PieSlice {
                    label: AFFECTED_LABEL.to_string(),
                    count: affected,
                    percent: share(affected),
                },
            ],
        }
    }

    /// Sum of slice counts
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.count).sum()
    }
}
