//! Applies per-column transformation chains over a dataset.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};
use crate::inference::ColumnType;
use crate::record::{Record, Value, parse_date, parse_number};

use super::operations::{TransformStep, apply_operation};

/// Per-column ordered operation chains. Columns not present pass through
/// unchanged.
pub type TransformationSpec = IndexMap<String, Vec<TransformStep>>;

/// Optional per-column coercion applied after the operation chain.
pub type TargetTypes = IndexMap<String, ColumnType>;

static BOOL_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(true|false|1|0|yes|no|evet|hayır)$").unwrap());

static BOOL_TRUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(true|1|yes|evet)$").unwrap());

/// A cell whose transformation chain failed. The cell keeps its original
/// value; one cell's failure never aborts the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellError {
    /// 1-based row index.
    pub row: usize,
    pub column: String,
    pub error: String,
    pub original_value: Value,
}

/// Result of transforming a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutcome {
    pub records: Vec<Record>,
    pub errors: Vec<CellError>,
}

/// Per-batch accounting for [`transform_batched`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// 1-based batch number.
    pub batch_number: usize,
    /// Rows in this batch.
    pub size: usize,
    /// Cells that failed in this batch.
    pub error_count: usize,
}

/// Result of a batched transform run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchedTransform {
    pub records: Vec<Record>,
    pub errors: Vec<CellError>,
    pub batches: Vec<BatchSummary>,
}

/// Transform a dataset: fold each column's enabled operations over the
/// cell's string form, then apply the optional target-type coercion.
///
/// Null cells and columns outside the spec pass through untouched, so a
/// fully-disabled spec with no coercion returns records equal to the input.
/// The only failure mode is an empty dataset.
pub fn transform(
    records: &[Record],
    spec: &TransformationSpec,
    target_types: &TargetTypes,
) -> Result<TransformOutcome> {
    if records.is_empty() {
        return Err(SiftError::EmptyData("no records to transform".to_string()));
    }

    let mut out_records = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for (i, record) in records.iter().enumerate() {
        let row_index = i + 1;
        let mut out = record.clone();

        for (column, steps) in spec {
            let Some(current) = record.get(column) else {
                continue;
            };
            if matches!(current, Value::Null) {
                continue;
            }

            match apply_chain(current, steps) {
                Ok((text, applied)) => {
                    let new_value = match (applied, target_types.get(column)) {
                        (false, None) => continue,
                        (_, Some(target)) => {
                            coerce(text.unwrap_or_else(|| current.to_text()), *target)
                        }
                        (true, None) => {
                            Value::String(text.expect("applied chain produces text"))
                        }
                    };
                    out.insert(column.clone(), new_value);
                }
                Err(error) => {
                    tracing::warn!(row = row_index, column = %column, %error, "cell transform failed");
                    errors.push(CellError {
                        row: row_index,
                        column: column.clone(),
                        error,
                        original_value: current.clone(),
                    });
                }
            }
        }

        out_records.push(out);
    }

    Ok(TransformOutcome {
        records: out_records,
        errors,
    })
}

/// [`transform`] over successive slices of the dataset. Stage results are
/// identical to a single whole-dataset call; the batching only bounds
/// per-call memory for surrounding I/O layers.
pub fn transform_batched(
    records: &[Record],
    spec: &TransformationSpec,
    target_types: &TargetTypes,
    batch_size: usize,
) -> Result<BatchedTransform> {
    if batch_size == 0 {
        return Err(SiftError::Config("batch size must be non-zero".to_string()));
    }

    let outcome = transform(records, spec, target_types)?;

    let mut batches = Vec::new();
    for (number, chunk) in records.chunks(batch_size).enumerate() {
        let batch_number = number + 1;
        let first_row = number * batch_size + 1;
        let last_row = first_row + chunk.len() - 1;
        let error_count = outcome
            .errors
            .iter()
            .filter(|e| e.row >= first_row && e.row <= last_row)
            .count();

        batches.push(BatchSummary {
            batch_number,
            size: chunk.len(),
            error_count,
        });
    }

    Ok(BatchedTransform {
        records: outcome.records,
        errors: outcome.errors,
        batches,
    })
}

/// Fold the enabled steps over a cell. Returns the produced text (None if no
/// step ran) or the first configuration error.
fn apply_chain(
    current: &Value,
    steps: &[TransformStep],
) -> std::result::Result<(Option<String>, bool), String> {
    let mut text: Option<String> = None;
    let mut applied = false;

    for step in steps.iter().filter(|s| s.enabled) {
        let input = text.get_or_insert_with(|| current.to_text());
        let output = apply_operation(&step.operation, input)?;
        *input = output;
        applied = true;
    }

    Ok((text, applied))
}

fn coerce(text: String, target: ColumnType) -> Value {
    match target {
        ColumnType::Number => match parse_number(&text) {
            Some(n) => Value::Number(n),
            None => Value::String(text),
        },
        ColumnType::Boolean => {
            if BOOL_LITERAL.is_match(text.trim()) {
                Value::Bool(BOOL_TRUE.is_match(text.trim()))
            } else {
                Value::String(text)
            }
        }
        ColumnType::Date => match parse_date(&text) {
            Some(date) => Value::Date(date),
            None => Value::String(text),
        },
        ColumnType::String => Value::String(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::operations::Operation;

    fn make_records(rows: Vec<Vec<(&str, &str)>>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (k.to_string(), Value::from(v)))
                    .collect()
            })
            .collect()
    }

    fn spec(column: &str, steps: Vec<TransformStep>) -> TransformationSpec {
        let mut spec = TransformationSpec::new();
        spec.insert(column.to_string(), steps);
        spec
    }

    #[test]
    fn test_chain_order_is_significant() {
        let records = make_records(vec![vec![("name", "  alice  ")]]);
        let steps = vec![
            TransformStep::new(Operation::Trim),
            TransformStep::new(Operation::Uppercase),
            TransformStep::new(Operation::Concat {
                prefix: String::new(),
                suffix: "!".to_string(),
            }),
        ];

        let outcome = transform(&records, &spec("name", steps), &TargetTypes::new()).unwrap();

        assert_eq!(outcome.records[0]["name"], Value::from("ALICE!"));
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_disabled_steps_are_noops_and_identity_holds() {
        let records = make_records(vec![
            vec![("name", "  alice  "), ("age", "30")],
            vec![("name", "bob"), ("age", "25")],
        ]);
        let steps = vec![
            TransformStep::disabled(Operation::Trim),
            TransformStep::disabled(Operation::Uppercase),
        ];

        let outcome = transform(&records, &spec("name", steps), &TargetTypes::new()).unwrap();

        assert_eq!(outcome.records, records);
    }

    #[test]
    fn test_untouched_columns_pass_through() {
        let records = make_records(vec![vec![("a", "x"), ("b", "y")]]);
        let steps = vec![TransformStep::new(Operation::Uppercase)];

        let outcome = transform(&records, &spec("a", steps), &TargetTypes::new()).unwrap();

        assert_eq!(outcome.records[0]["a"], Value::from("X"));
        assert_eq!(outcome.records[0]["b"], Value::from("y"));
    }

    #[test]
    fn test_config_error_reverts_cell_and_continues() {
        let records = make_records(vec![vec![("a", "keep me"), ("b", "other")]]);
        let steps = vec![
            TransformStep::new(Operation::Uppercase),
            TransformStep::new(Operation::RegexReplace {
                pattern: "[".to_string(),
                replacement: "x".to_string(),
            }),
        ];

        let outcome = transform(&records, &spec("a", steps), &TargetTypes::new()).unwrap();

        assert_eq!(outcome.records[0]["a"], Value::from("keep me"));
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].row, 1);
        assert_eq!(outcome.errors[0].column, "a");
        assert_eq!(outcome.errors[0].original_value, Value::from("keep me"));
    }

    #[test]
    fn test_null_cells_pass_through() {
        let mut record = Record::new();
        record.insert("a".to_string(), Value::Null);
        let steps = vec![TransformStep::new(Operation::Constant {
            value: "filled".to_string(),
        })];

        let outcome = transform(&[record], &spec("a", steps), &TargetTypes::new()).unwrap();

        assert_eq!(outcome.records[0]["a"], Value::Null);
    }

    #[test]
    fn test_target_type_coercion() {
        let records = make_records(vec![vec![
            ("n", " 42 "),
            ("b", "Evet"),
            ("d", "2023-01-05"),
            ("bad", "nope"),
        ]]);
        let mut targets = TargetTypes::new();
        targets.insert("n".to_string(), ColumnType::Number);
        targets.insert("b".to_string(), ColumnType::Boolean);
        targets.insert("d".to_string(), ColumnType::Date);
        targets.insert("bad".to_string(), ColumnType::Number);

        let outcome = transform(&records, &TransformationSpec::new(), &targets).unwrap();

        assert_eq!(outcome.records[0]["n"], Value::Number(42.0));
        assert_eq!(outcome.records[0]["b"], Value::Bool(true));
        assert_eq!(
            outcome.records[0]["d"],
            Value::Date(chrono::NaiveDate::from_ymd_opt(2023, 1, 5).unwrap())
        );
        // Coercion failures are silent: the value is kept as-is.
        assert_eq!(outcome.records[0]["bad"], Value::from("nope"));
    }

    #[test]
    fn test_empty_dataset_is_a_terminal_failure() {
        assert!(matches!(
            transform(&[], &TransformationSpec::new(), &TargetTypes::new()),
            Err(SiftError::EmptyData(_))
        ));
    }

    #[test]
    fn test_batched_matches_unbatched() {
        let records = make_records(vec![
            vec![("a", " x ")],
            vec![("a", " y ")],
            vec![("a", " z ")],
        ]);
        let spec = spec("a", vec![TransformStep::new(Operation::Trim)]);

        let whole = transform(&records, &spec, &TargetTypes::new()).unwrap();
        let batched = transform_batched(&records, &spec, &TargetTypes::new(), 2).unwrap();

        assert_eq!(batched.records, whole.records);
        assert_eq!(batched.batches.len(), 2);
        assert_eq!(batched.batches[0].size, 2);
        assert_eq!(batched.batches[1].size, 1);
        assert_eq!(batched.batches[1].batch_number, 2);
    }
}
