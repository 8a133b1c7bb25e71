//! Rule evaluation over a dataset.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::{Result, SiftError};
use crate::record::{Record, Value, field};
use crate::rules::{RuleCheck, RuleSet, Severity};

use super::report::{ColumnIssueCounts, ValidationIssue, ValidationReport};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{10,}$").unwrap());

/// Outcome of running one check against one cell.
enum CheckOutcome {
    Pass,
    Fail,
    /// The rule itself could not be evaluated; the cell is unaffected.
    Skipped(String),
}

/// Evaluate a rule set against a dataset.
///
/// Every rule of every column is checked against every row independently; a
/// failing rule never short-circuits the rest. Unevaluable rules are skipped
/// with a diagnostic. The only failure modes are caller contract violations:
/// an empty dataset or an empty rule set.
pub fn evaluate(records: &[Record], rules: &RuleSet) -> Result<ValidationReport> {
    if records.is_empty() {
        return Err(SiftError::EmptyData("no records to validate".to_string()));
    }
    if rules.is_empty() {
        return Err(SiftError::EmptyRuleSet);
    }

    // User patterns are compiled once up front; a malformed pattern skips
    // its rule for the whole run.
    let patterns = compile_user_patterns(rules);

    let mut report = ValidationReport::new(records.len());
    for column in rules.keys() {
        report
            .summary
            .insert(column.clone(), ColumnIssueCounts::default());
    }

    let mut skipped: IndexSet<String> = IndexSet::new();
    let mut error_rows_by_column: HashMap<String, BTreeSet<usize>> = HashMap::new();

    for (i, record) in records.iter().enumerate() {
        let row_index = i + 1;
        let mut row_error_count = 0usize;

        for (column, column_rules) in rules {
            let value = field(record, column);

            for rule in column_rules {
                match run_check(&rule.check, value, &patterns) {
                    CheckOutcome::Pass => {}
                    CheckOutcome::Skipped(reason) => {
                        let note = format!(
                            "skipped rule '{}' for column '{}': {}",
                            rule.check.name(),
                            column,
                            reason
                        );
                        if skipped.insert(note) {
                            tracing::warn!(
                                column = %column,
                                rule = rule.check.name(),
                                %reason,
                                "skipping unevaluable rule"
                            );
                        }
                    }
                    CheckOutcome::Fail => {
                        let issue = ValidationIssue {
                            column: column.clone(),
                            value: value.clone(),
                            rule: rule.check.name().to_string(),
                            message: rule.message.clone().unwrap_or_else(|| {
                                format!("Validation failed for {}: {}", column, rule.check.name())
                            }),
                            severity: rule.severity,
                            row_index,
                        };

                        let counts = report
                            .summary
                            .get_mut(column)
                            .expect("summary initialized for every rule column");

                        match rule.severity {
                            Severity::Error => {
                                row_error_count += 1;
                                report.total_errors += 1;
                                counts.errors += 1;
                                error_rows_by_column
                                    .entry(column.clone())
                                    .or_default()
                                    .insert(row_index);
                                report.errors.push(issue);
                            }
                            Severity::Warning => {
                                report.total_warnings += 1;
                                counts.warnings += 1;
                                report.warnings.push(issue);
                            }
                        }
                    }
                }
            }
        }

        if row_error_count == 0 {
            report.valid_rows += 1;
        } else {
            report.invalid_rows += 1;
        }
    }

    for (column, rows) in &error_rows_by_column {
        if let Some(counts) = report.summary.get_mut(column) {
            counts.invalid_rows = rows.len();
        }
    }

    report.diagnostics = skipped.into_iter().collect();
    Ok(report)
}

fn compile_user_patterns(rules: &RuleSet) -> HashMap<String, Option<Regex>> {
    let mut patterns = HashMap::new();
    for column_rules in rules.values() {
        for rule in column_rules {
            if let RuleCheck::Regex { pattern } = &rule.check {
                patterns
                    .entry(pattern.clone())
                    .or_insert_with(|| Regex::new(pattern).ok());
            }
        }
    }
    patterns
}

fn run_check(
    check: &RuleCheck,
    value: &Value,
    patterns: &HashMap<String, Option<Regex>>,
) -> CheckOutcome {
    if let RuleCheck::Unknown = check {
        return CheckOutcome::Skipped("unknown rule kind".to_string());
    }

    // Emptiness is "no opinion", not "invalid": only `required` asserts
    // mandatory-ness.
    if value.is_empty() {
        return if matches!(check, RuleCheck::Required) {
            CheckOutcome::Fail
        } else {
            CheckOutcome::Pass
        };
    }

    let text = value.to_text();

    let passed = match check {
        RuleCheck::Required => true,
        RuleCheck::Email => EMAIL_PATTERN.is_match(&text),
        RuleCheck::Phone => PHONE_PATTERN.is_match(&text),
        RuleCheck::Url => Url::parse(&text).is_ok(),
        RuleCheck::MinLength { min } => text.chars().count() >= *min,
        RuleCheck::MaxLength { max } => text.chars().count() <= *max,
        RuleCheck::MinValue { min } => value.as_number().is_some_and(|n| n >= *min),
        RuleCheck::MaxValue { max } => value.as_number().is_some_and(|n| n <= *max),
        RuleCheck::Regex { pattern } => match patterns.get(pattern).and_then(|p| p.as_ref()) {
            Some(regex) => regex.is_match(&text),
            None => {
                return CheckOutcome::Skipped(format!("malformed pattern '{pattern}'"));
            }
        },
        RuleCheck::DateRange { min_date, max_date } => match value.as_date() {
            Some(date) => {
                min_date.is_none_or(|min| date >= min) && max_date.is_none_or(|max| date <= max)
            }
            None => false,
        },
        RuleCheck::Enum { allowed } => allowed.iter().any(|a| a == &text),
        RuleCheck::Unknown => unreachable!("handled above"),
    };

    if passed {
        CheckOutcome::Pass
    } else {
        CheckOutcome::Fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ValidationRule;

    fn make_records(rows: Vec<Vec<(&str, &str)>>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (k.to_string(), Value::from(v)))
                    .collect()
            })
            .collect()
    }

    fn rule_set(column: &str, rules: Vec<ValidationRule>) -> RuleSet {
        let mut set = RuleSet::new();
        set.insert(column.to_string(), rules);
        set
    }

    #[test]
    fn test_min_value_fails_unparseable_and_exempts_empty() {
        let records = make_records(vec![
            vec![("age", "30")],
            vec![("age", "forty")],
            vec![("age", "")],
        ]);
        let rules = rule_set(
            "age",
            vec![ValidationRule::new(RuleCheck::MinValue { min: 20.0 })],
        );

        let report = evaluate(&records, &rules).unwrap();

        assert_eq!(report.total_errors, 1);
        assert_eq!(report.valid_rows, 2);
        assert_eq!(report.invalid_rows, 1);
        assert_eq!(report.errors[0].row_index, 2);
        assert_eq!(report.errors[0].rule, "min_value");
    }

    #[test]
    fn test_required_fails_empty_and_absent() {
        let mut records = make_records(vec![vec![("name", "Alice")], vec![("name", " ")]]);
        records.push(Record::new());
        let rules = rule_set("name", vec![ValidationRule::new(RuleCheck::Required)]);

        let report = evaluate(&records, &rules).unwrap();

        assert_eq!(report.total_errors, 2);
        assert_eq!(report.valid_rows, 1);
    }

    #[test]
    fn test_email_and_enum_checks() {
        let records = make_records(vec![
            vec![("contact", "a@b.com"), ("status", "open")],
            vec![("contact", "not-an-email"), ("status", "pending")],
        ]);
        let mut rules = rule_set("contact", vec![ValidationRule::new(RuleCheck::Email)]);
        rules.insert(
            "status".to_string(),
            vec![ValidationRule::new(RuleCheck::Enum {
                allowed: vec!["open".to_string(), "closed".to_string()],
            })],
        );

        let report = evaluate(&records, &rules).unwrap();

        assert_eq!(report.total_errors, 2);
        assert_eq!(report.valid_rows, 1);
        assert_eq!(report.summary["contact"].errors, 1);
        assert_eq!(report.summary["status"].errors, 1);
    }

    #[test]
    fn test_warnings_do_not_invalidate_rows() {
        let records = make_records(vec![vec![("name", "x")]]);
        let rules = rule_set(
            "name",
            vec![
                ValidationRule::new(RuleCheck::MinLength { min: 3 })
                    .with_severity(Severity::Warning),
            ],
        );

        let report = evaluate(&records, &rules).unwrap();

        assert_eq!(report.total_warnings, 1);
        assert_eq!(report.total_errors, 0);
        assert_eq!(report.valid_rows, 1);
        assert_eq!(report.invalid_rows, 0);
    }

    #[test]
    fn test_malformed_pattern_skips_rule_with_diagnostic() {
        let records = make_records(vec![vec![("code", "AB12")]]);
        let rules = rule_set(
            "code",
            vec![ValidationRule::new(RuleCheck::Regex {
                pattern: "[unclosed".to_string(),
            })],
        );

        let report = evaluate(&records, &rules).unwrap();

        assert_eq!(report.total_errors, 0);
        assert_eq!(report.valid_rows, 1);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("malformed pattern"));
    }

    #[test]
    fn test_unknown_rule_kind_is_skipped() {
        let records = make_records(vec![vec![("code", "x")]]);
        let rules = rule_set("code", vec![ValidationRule::new(RuleCheck::Unknown)]);

        let report = evaluate(&records, &rules).unwrap();

        assert_eq!(report.total_errors, 0);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("unknown rule kind"));
    }

    #[test]
    fn test_date_range_bounds() {
        let records = make_records(vec![
            vec![("joined", "2023-06-15")],
            vec![("joined", "1850-01-01")],
            vec![("joined", "never")],
        ]);
        let rules = rule_set(
            "joined",
            vec![ValidationRule::new(RuleCheck::DateRange {
                min_date: chrono::NaiveDate::from_ymd_opt(1900, 1, 1),
                max_date: chrono::NaiveDate::from_ymd_opt(2100, 12, 31),
            })],
        );

        let report = evaluate(&records, &rules).unwrap();

        assert_eq!(report.total_errors, 2);
        assert_eq!(report.valid_rows, 1);
    }

    #[test]
    fn test_empty_inputs_are_terminal_failures() {
        let rules = rule_set("a", vec![ValidationRule::new(RuleCheck::Required)]);
        assert!(matches!(
            evaluate(&[], &rules),
            Err(SiftError::EmptyData(_))
        ));

        let records = make_records(vec![vec![("a", "1")]]);
        assert!(matches!(
            evaluate(&records, &RuleSet::new()),
            Err(SiftError::EmptyRuleSet)
        ));
    }

    #[test]
    fn test_report_counts_are_consistent() {
        let records = make_records(vec![
            vec![("age", "5")],
            vec![("age", "25")],
            vec![("age", "forty")],
        ]);
        let rules = rule_set(
            "age",
            vec![
                ValidationRule::new(RuleCheck::MinValue { min: 10.0 }),
                ValidationRule::new(RuleCheck::MaxValue { max: 30.0 }),
            ],
        );

        let report = evaluate(&records, &rules).unwrap();

        // Row 1 fails min_value; row 3 fails both (unparseable).
        assert_eq!(report.total_errors, 3);
        assert_eq!(report.valid_rows + report.invalid_rows, report.total_rows);
        assert_eq!(report.invalid_rows, 2);
        assert_eq!(report.summary["age"].invalid_rows, 2);
    }
}
