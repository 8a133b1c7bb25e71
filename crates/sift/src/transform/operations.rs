//! Per-value transformation operations.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::record::parse_date;

use super::formula;

/// Target pattern for date re-rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DateStyle {
    #[default]
    #[serde(rename = "YYYY-MM-DD")]
    YearMonthDay,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
}

impl DateStyle {
    pub fn render(&self, date: NaiveDate) -> String {
        match self {
            DateStyle::YearMonthDay => date.format("%Y-%m-%d").to_string(),
            DateStyle::DayMonthYear => date.format("%d/%m/%Y").to_string(),
            DateStyle::MonthDayYear => date.format("%m/%d/%Y").to_string(),
        }
    }

    /// Resolve a style from its pattern string; anything unrecognized falls
    /// back to the default.
    pub(crate) fn from_pattern(pattern: &str) -> Self {
        match pattern {
            "DD/MM/YYYY" => DateStyle::DayMonthYear,
            "MM/DD/YYYY" => DateStyle::MonthDayYear,
            _ => DateStyle::YearMonthDay,
        }
    }
}

/// A named value-rewriting operation. Operations consume and produce the
/// string form of a cell; anything that cannot be applied leaves the value
/// unchanged rather than raising.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Strip surrounding whitespace.
    Trim,
    Uppercase,
    Lowercase,
    /// Re-render as a date; unparseable values pass through.
    DateFormat {
        #[serde(default)]
        format: DateStyle,
    },
    /// Global replace by user pattern.
    RegexReplace { pattern: String, replacement: String },
    /// Ignore the input entirely and substitute a fixed value.
    Constant { value: String },
    /// Mini formula expression (CONCAT, UPPER, LOWER, TRIM, LENGTH,
    /// SUBSTRING, REPLACE, DATE_FORMAT).
    Formula { expression: String },
    /// Prefix/suffix concatenation.
    Concat {
        #[serde(default)]
        prefix: String,
        #[serde(default)]
        suffix: String,
    },
    /// Substring by 0-based character indices.
    Extract { start: usize, end: usize },
    /// Literal search/replace.
    ReplaceText { search: String, replace: String },
}

/// One step of a column's transformation chain. Disabled steps are no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStep {
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(flatten)]
    pub operation: Operation,
}

fn enabled_default() -> bool {
    true
}

impl TransformStep {
    pub fn new(operation: Operation) -> Self {
        Self {
            enabled: true,
            operation,
        }
    }

    pub fn disabled(operation: Operation) -> Self {
        Self {
            enabled: false,
            operation,
        }
    }
}

/// Apply one operation to a value's string form.
///
/// `Err` carries a configuration failure (currently only a malformed regex
/// pattern); the caller records it and keeps the original cell. All data
/// failures degrade to pass-through.
pub(crate) fn apply_operation(operation: &Operation, input: &str) -> Result<String, String> {
    let output = match operation {
        Operation::Trim => input.trim().to_string(),
        Operation::Uppercase => input.to_uppercase(),
        Operation::Lowercase => input.to_lowercase(),
        Operation::DateFormat { format } => match parse_date(input) {
            Some(date) => format.render(date),
            None => input.to_string(),
        },
        Operation::RegexReplace {
            pattern,
            replacement,
        } => match Regex::new(pattern) {
            Ok(regex) => regex.replace_all(input, replacement.as_str()).into_owned(),
            Err(e) => return Err(format!("invalid pattern '{pattern}': {e}")),
        },
        Operation::Constant { value } => value.clone(),
        Operation::Formula { expression } => formula::evaluate(expression, input),
        Operation::Concat { prefix, suffix } => format!("{prefix}{input}{suffix}"),
        Operation::Extract { start, end } => input
            .chars()
            .skip(*start)
            .take(end.saturating_sub(*start))
            .collect(),
        Operation::ReplaceText { search, replace } => {
            if search.is_empty() {
                input.to_string()
            } else {
                input.replace(search.as_str(), replace)
            }
        }
    };

    Ok(output)
}
