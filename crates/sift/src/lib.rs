//! Sift: schema inference and data cleaning engine for tabular imports.
//!
//! Sift ingests records with an unknown, heterogeneous schema (typically
//! spreadsheet imports), infers a semantic type per column, derives and
//! evaluates validation rules, applies per-column transformation chains, and
//! reconciles validation results back into row-level fixes or removals.
//!
//! # Core principles
//!
//! - **Never fail on data**: malformed values surface as confidence scores,
//!   diagnostics, and per-cell errors, never as exceptions
//! - **Pure and stateless**: every stage is a synchronous transform over
//!   in-memory records with no I/O and no cross-call state
//! - **Full audit trail**: every fix and removal is logged
//!
//! # Example
//!
//! ```
//! use sift::{CleaningOptions, Record, Sift, Value};
//!
//! let records: Vec<Record> = vec![
//!     Record::from([("age".to_string(), Value::from("30"))]),
//!     Record::from([("age".to_string(), Value::from("forty"))]),
//! ];
//!
//! let sift = Sift::new();
//! let result = sift.refine(&records, &CleaningOptions::default()).unwrap();
//!
//! assert_eq!(result.report.total_rows, 2);
//! ```

pub mod clean;
pub mod error;
pub mod inference;
pub mod record;
pub mod rules;
pub mod transform;
pub mod validation;

mod sift;

pub use crate::sift::{RefineResult, Sift, SiftConfig};
pub use clean::{CleaningAction, CleaningOptions, CleaningOutcome, clean};
pub use error::{Result, SiftError};
pub use inference::{ColumnAnalyzer, ColumnProfile, ColumnType, infer_column_types};
pub use record::{Record, Value, column_names};
pub use rules::{RuleCheck, RuleSet, Severity, ValidationRule, generate_rules, rule_set_from_json};
pub use transform::{
    BatchedTransform, CellError, DateStyle, Operation, TargetTypes, TransformOutcome,
    TransformStep, TransformationSpec, transform, transform_batched,
};
pub use validation::{ColumnIssueCounts, ValidationIssue, ValidationReport, evaluate};
