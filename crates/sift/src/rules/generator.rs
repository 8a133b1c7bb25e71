//! Derives a default rule set from inferred column profiles.

use chrono::NaiveDate;
use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::inference::{ColumnProfile, ColumnType};
use crate::record::parse_number;

use super::{RuleCheck, RuleSet, ValidationRule};

/// Sanity bounds for generated date rules: a generous fixed era rather than
/// a tight inferred range.
static DATE_ERA_MIN: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
static DATE_ERA_MAX: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2100, 12, 31).unwrap());

/// Columns with fewer nulls than this get a `required` rule.
const REQUIRED_NULL_THRESHOLD: u8 = 20;

/// Generated string-length bounds leave this much headroom over the longest
/// sampled value; the sample is not exhaustive.
const LENGTH_HEADROOM: usize = 2;

/// Derive a default validation rule set from column profiles.
///
/// Pure and deterministic; never fails. Columns that produce no rules are
/// omitted from the result entirely.
pub fn generate_rules(profiles: &IndexMap<String, ColumnProfile>) -> RuleSet {
    let mut rules = RuleSet::new();

    for (column, profile) in profiles {
        let column_rules = rules_for_column(column, profile);
        if !column_rules.is_empty() {
            rules.insert(column.clone(), column_rules);
        }
    }

    rules
}

fn rules_for_column(column: &str, profile: &ColumnProfile) -> Vec<ValidationRule> {
    let mut rules = Vec::new();

    if profile.null_percentage < REQUIRED_NULL_THRESHOLD {
        rules.push(
            ValidationRule::new(RuleCheck::Required)
                .with_message(format!("{column} is required")),
        );
    }

    match profile.inferred_type {
        ColumnType::Number => {
            if let Some((min, max)) = sample_range(&profile.sample_values) {
                // A constant column gets no range rules: any bound derived
                // from a single observed value would be tautological.
                if min != max {
                    rules.push(
                        ValidationRule::new(RuleCheck::MinValue { min })
                            .with_message(format!("{column} must be at least {min}")),
                    );
                    rules.push(
                        ValidationRule::new(RuleCheck::MaxValue { max })
                            .with_message(format!("{column} must be at most {max}")),
                    );
                }
            }
        }
        ColumnType::Date => {
            rules.push(
                ValidationRule::new(RuleCheck::DateRange {
                    min_date: Some(*DATE_ERA_MIN),
                    max_date: Some(*DATE_ERA_MAX),
                })
                .with_message(format!("{column} must be a valid date")),
            );
        }
        ColumnType::String => {
            let longest = profile
                .sample_values
                .iter()
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0);
            if longest > 0 {
                let max = longest * LENGTH_HEADROOM;
                rules.push(
                    ValidationRule::new(RuleCheck::MaxLength { max })
                        .with_message(format!("{column} must not exceed {max} characters")),
                );
            }
        }
        ColumnType::Boolean => {}
    }

    rules
}

/// Observed (min, max) over the parseable sample values, if any.
fn sample_range(sample_values: &[String]) -> Option<(f64, f64)> {
    let numbers: Vec<f64> = sample_values.iter().filter_map(|s| parse_number(s)).collect();

    if numbers.is_empty() {
        return None;
    }

    let min = numbers.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}
