//! Reconciles validation results back into row-level fixes or removals.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};
use crate::record::{Record, Value};
use crate::validation::ValidationReport;

/// Cleaning policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningOptions {
    /// Drop rows that have at least one error in the report.
    #[serde(default)]
    pub remove_invalid_rows: bool,
    /// Trim string cells and fill empty cells from `default_values`.
    #[serde(default = "fix_default")]
    pub fix_common_issues: bool,
    /// Substitutes for empty or absent cells, by column.
    #[serde(default)]
    pub default_values: IndexMap<String, Value>,
}

fn fix_default() -> bool {
    true
}

impl Default for CleaningOptions {
    fn default() -> Self {
        Self {
            remove_invalid_rows: false,
            fix_common_issues: true,
            default_values: IndexMap::new(),
        }
    }
}

/// One entry of the cleaning audit trail. The log is never re-consumed by
/// the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CleaningAction {
    #[serde(rename_all = "camelCase")]
    Removed { row_index: usize, reason: String },
    #[serde(rename_all = "camelCase")]
    Trimmed {
        row_index: usize,
        column: String,
        old_value: Value,
        new_value: Value,
    },
    #[serde(rename_all = "camelCase")]
    DefaultValue {
        row_index: usize,
        column: String,
        old_value: Value,
        new_value: Value,
    },
}

/// Result of a cleaning pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningOutcome {
    pub records: Vec<Record>,
    pub log: Vec<CleaningAction>,
    pub removed_count: usize,
}

/// Clean a dataset against its validation report.
///
/// Row order is preserved; removed rows are fully excluded, never partially
/// kept. Row indices in the report and the log are 1-based over the *input*
/// dataset.
pub fn clean(
    records: &[Record],
    report: &ValidationReport,
    options: &CleaningOptions,
) -> Result<CleaningOutcome> {
    if records.is_empty() {
        return Err(SiftError::EmptyData("no records to clean".to_string()));
    }

    let mut cleaned = Vec::with_capacity(records.len());
    let mut log = Vec::new();
    let mut removed_count = 0usize;

    for (i, record) in records.iter().enumerate() {
        let row_index = i + 1;

        if options.remove_invalid_rows {
            let error_count = report.error_count_for_row(row_index);
            if error_count > 0 {
                log.push(CleaningAction::Removed {
                    row_index,
                    reason: format!("{error_count} validation errors"),
                });
                removed_count += 1;
                continue;
            }
        }

        let mut row = record.clone();

        if options.fix_common_issues {
            for column in cell_columns(record, options) {
                let original = row.get(&column).cloned().unwrap_or(Value::Null);
                let mut value = original.clone();

                let trimmed = match &value {
                    Value::String(s) if s.trim() != s.as_str() => {
                        Some(Value::String(s.trim().to_string()))
                    }
                    _ => None,
                };
                if let Some(new_value) = trimmed {
                    log.push(CleaningAction::Trimmed {
                        row_index,
                        column: column.clone(),
                        old_value: original.clone(),
                        new_value: new_value.clone(),
                    });
                    value = new_value;
                }

                if value.is_empty() {
                    if let Some(default) = options.default_values.get(&column) {
                        log.push(CleaningAction::DefaultValue {
                            row_index,
                            column: column.clone(),
                            old_value: value.clone(),
                            new_value: default.clone(),
                        });
                        value = default.clone();
                    }
                }

                if value != original || row.contains_key(&column) {
                    row.insert(column, value);
                }
            }
        }

        cleaned.push(row);
    }

    Ok(CleaningOutcome {
        records: cleaned,
        log,
        removed_count,
    })
}

/// Columns to visit for a row: its own keys plus every column with a
/// configured default, so absent cells can be filled too.
fn cell_columns(record: &Record, options: &CleaningOptions) -> Vec<String> {
    let mut columns: IndexSet<String> = record.keys().cloned().collect();
    for column in options.default_values.keys() {
        columns.insert(column.clone());
    }
    columns.into_iter().collect()
}
