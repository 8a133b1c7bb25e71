//! Per-value bucket classification and the column analyzer.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{Value, parse_number};

use super::profile::{ColumnProfile, ColumnType};

/// Bucket precedence, lowest first. When shares tie, the later bucket wins:
/// boolean beats date beats number beats string.
pub(crate) const BUCKETS: [ColumnType; 4] = [
    ColumnType::String,
    ColumnType::Number,
    ColumnType::Date,
    ColumnType::Boolean,
];

static BOOLEAN_LITERALS: Lazy<Regex> = Lazy::new(|| {
    // Bilingual yes/no literal set.
    Regex::new(r"(?i)^(true|false|yes|no|1|0|evet|hayır|tamam|ok)$").unwrap()
});

static DATE_LOOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,4}[/\-.]\d{1,2}[/\-.]\d{1,4}$").unwrap());

static DATE_ISO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Classify a single trimmed, non-empty value into exactly one bucket.
/// Checks run in reverse precedence order so that a value matching several
/// patterns lands in the highest bucket.
pub(crate) fn classify(value: &str) -> ColumnType {
    if BOOLEAN_LITERALS.is_match(value) {
        ColumnType::Boolean
    } else if DATE_LOOSE.is_match(value) || DATE_ISO.is_match(value) {
        ColumnType::Date
    } else if parse_number(value).is_some() {
        ColumnType::Number
    } else {
        ColumnType::String
    }
}

/// Infers a [`ColumnProfile`] from a column's values.
///
/// Only the first `sample_size` values are classified; spreadsheets are
/// usually append-ordered, so the first-seen bias is intentional. Never
/// fails: the input is untrusted external data.
#[derive(Debug, Clone)]
pub struct ColumnAnalyzer {
    /// Maximum number of values to classify.
    sample_size: usize,
    /// Maximum number of sample values to retain on the profile.
    max_sample_values: usize,
}

impl ColumnAnalyzer {
    pub fn new() -> Self {
        Self {
            sample_size: 100,
            max_sample_values: 5,
        }
    }

    pub fn with_sample_size(sample_size: usize) -> Self {
        Self {
            sample_size,
            ..Self::new()
        }
    }

    /// Analyze one column. `values` must hold the full column, in row order.
    pub fn analyze(&self, values: &[&Value]) -> ColumnProfile {
        let full_nulls = values.iter().filter(|v| v.is_empty()).count();
        let null_percentage = share_of(full_nulls, values.len());

        let mut counts = [0usize; BUCKETS.len()];
        let mut sampled = 0usize;
        let mut sample_values = Vec::new();

        for value in values.iter().take(self.sample_size) {
            if value.is_empty() {
                continue;
            }

            let text = value.to_text().trim().to_string();
            sampled += 1;
            if sample_values.len() < self.max_sample_values {
                sample_values.push(text.clone());
            }

            let bucket = classify(&text);
            let idx = BUCKETS.iter().position(|b| *b == bucket).unwrap_or(0);
            counts[idx] += 1;
        }

        if sampled == 0 {
            return ColumnProfile {
                inferred_type: ColumnType::String,
                confidence: 0,
                null_percentage,
                sample_values,
            };
        }

        // max_by_key on (count, index): equal counts resolve to the later
        // bucket, making the tie-break an explicit policy.
        let (winner_idx, winner_count) = counts
            .iter()
            .enumerate()
            .map(|(idx, count)| (idx, *count))
            .max_by_key(|(idx, count)| (*count, *idx))
            .unwrap_or((0, 0));

        ColumnProfile {
            inferred_type: BUCKETS[winner_idx],
            confidence: share_of(winner_count, sampled),
            null_percentage,
            sample_values,
        }
    }
}

impl Default for ColumnAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn share_of(count: usize, total: usize) -> u8 {
    if total == 0 {
        0
    } else {
        ((count as f64 / total as f64) * 100.0).round() as u8
    }
}
