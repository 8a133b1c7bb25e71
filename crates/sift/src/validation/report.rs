//! Validation issue and report types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::record::Value;
use crate::rules::Severity;

/// One failed (row, rule) pair. Multiple rules failing on the same cell
/// produce multiple issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Affected column.
    pub column: String,
    /// The offending cell value.
    pub value: Value,
    /// Kind name of the failed rule.
    pub rule: String,
    /// Failure message.
    pub message: String,
    pub severity: Severity,
    /// 1-based row index.
    pub row_index: usize,
}

/// Per-column issue counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnIssueCounts {
    pub errors: usize,
    pub warnings: usize,
    /// Distinct rows with at least one error in this column.
    pub invalid_rows: usize,
}

/// Aggregate validation outcome over a dataset.
///
/// Invariant: `valid_rows + invalid_rows == total_rows`. A row is valid when
/// it has zero error-severity failures; warnings do not count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    /// Issue counts per rule-set column.
    pub summary: IndexMap<String, ColumnIssueCounts>,
    /// Rules that could not be evaluated (unknown kind, malformed pattern),
    /// one entry per distinct (column, kind).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl ValidationReport {
    pub(crate) fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            valid_rows: 0,
            invalid_rows: 0,
            total_errors: 0,
            total_warnings: 0,
            errors: Vec::new(),
            warnings: Vec::new(),
            summary: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Share of valid rows, 0-100.
    pub fn quality_score(&self) -> u8 {
        if self.total_rows == 0 {
            return 0;
        }
        ((self.valid_rows as f64 / self.total_rows as f64) * 100.0).round() as u8
    }

    /// Number of error-severity issues on a given 1-based row.
    pub fn error_count_for_row(&self, row_index: usize) -> usize {
        self.errors
            .iter()
            .filter(|e| e.row_index == row_index)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_score_rounds() {
        let mut report = ValidationReport::new(3);
        report.valid_rows = 2;
        report.invalid_rows = 1;

        assert_eq!(report.quality_score(), 67);
    }

    #[test]
    fn test_quality_score_of_empty_report() {
        assert_eq!(ValidationReport::new(0).quality_score(), 0);
    }
}
