//! Column profile produced by type inference.

use serde::{Deserialize, Serialize};

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Text values (fallback bucket).
    String,
    /// Numeric values.
    Number,
    /// Calendar dates.
    Date,
    /// True/false-like values.
    Boolean,
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::String
    }
}

/// Inferred type and quality metrics for one column.
///
/// Created fresh per analysis call and never mutated afterwards. Confidence
/// is computed over the sampled values only; the null percentage covers the
/// full column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnProfile {
    /// The winning type bucket.
    #[serde(rename = "type")]
    pub inferred_type: ColumnType,
    /// Share of sampled non-null values matching the winning type (0-100).
    pub confidence: u8,
    /// Share of null values over the full column (0-100).
    pub null_percentage: u8,
    /// Up to 5 raw string forms of non-null values, in first-seen order.
    pub sample_values: Vec<String>,
}

impl ColumnProfile {
    /// Human-readable summary of what the inference detected.
    pub fn type_explanation(&self) -> &'static str {
        match self.inferred_type {
            ColumnType::Number => "numeric values detected",
            ColumnType::Date => "date format detected",
            ColumnType::Boolean => "yes/no values detected",
            ColumnType::String => "text format detected",
        }
    }
}
