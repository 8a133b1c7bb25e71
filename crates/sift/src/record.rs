//! Schema-less records: a dataset is an ordered sequence of column→value maps.

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A single cell value.
///
/// Variant order matters for deserialization: untagged decoding tries each in
/// turn, so ISO date strings become [`Value::Date`] rather than strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing or explicitly null.
    Null,
    /// Boolean values.
    Bool(bool),
    /// Numeric values (integers included).
    Number(f64),
    /// Calendar dates.
    Date(NaiveDate),
    /// Everything else.
    String(String),
}

impl Value {
    /// A value counts as empty if it is null or a string that trims to
    /// nothing. Every validation rule except `required` passes on empty
    /// values.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The string form consumed by validators and transformations.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::String(s) => s.clone(),
        }
    }

    /// The canonical numeric reading of a value, applied uniformly by the
    /// type inferencer, the numeric rules, and number coercion: trimmed,
    /// non-empty, and a finite float parse.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// The calendar-date reading of a value, if any.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::String(s) => parse_date(s),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// One row of data. Insertion order is preserved but not significant.
pub type Record = IndexMap<String, Value>;

/// Read a cell, treating absent keys as null.
pub fn field<'a>(record: &'a Record, column: &str) -> &'a Value {
    record.get(column).unwrap_or(&Value::Null)
}

/// The columns of a dataset: the union of keys across all records, in
/// first-seen order. Individual records may be missing keys.
pub fn column_names(records: &[Record]) -> Vec<String> {
    let mut names: IndexSet<String> = IndexSet::new();
    for record in records {
        for key in record.keys() {
            names.insert(key.clone());
        }
    }
    names.into_iter().collect()
}

/// Parse a string with the canonical numeric predicate.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a date from the separator shapes the inferencer recognizes.
/// Ambiguous slash dates resolve month-first.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    const FORMATS: [&str; 6] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%d/%m/%Y",
        "%d.%m.%Y",
        "%d-%m-%Y",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}
