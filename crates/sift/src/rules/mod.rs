//! Validation rule model: rule kinds, severities, and rule sets.

mod generator;

pub use generator::generate_rules;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Severity of a failed rule. Warnings never make a row invalid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth surfacing, does not affect row validity.
    Warning,
    /// Makes the row invalid.
    #[default]
    Error,
}

/// A rule check with its kind-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCheck {
    /// Value must be non-empty.
    Required,
    /// Single-@ email shape.
    Email,
    /// At least 10 digits/separators, optional leading +.
    Phone,
    /// Parses as an absolute URL.
    Url,
    /// Minimum string length.
    MinLength { min: usize },
    /// Maximum string length.
    MaxLength { max: usize },
    /// Minimum numeric value; unparseable values fail.
    MinValue { min: f64 },
    /// Maximum numeric value; unparseable values fail.
    MaxValue { max: f64 },
    /// Value must match a user-supplied pattern. A malformed pattern skips
    /// the rule with a diagnostic instead of failing values.
    Regex { pattern: String },
    /// Value must parse as a date within the optional bounds.
    DateRange {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_date: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_date: Option<NaiveDate>,
    },
    /// Value must be a member of the allowed set.
    Enum { allowed: Vec<String> },
    /// Catch-all for rule kinds this version does not know. Skipped with a
    /// diagnostic at evaluation time.
    #[serde(other)]
    Unknown,
}

impl RuleCheck {
    /// Stable kind name, as reported in validation issues.
    pub fn name(&self) -> &'static str {
        match self {
            RuleCheck::Required => "required",
            RuleCheck::Email => "email",
            RuleCheck::Phone => "phone",
            RuleCheck::Url => "url",
            RuleCheck::MinLength { .. } => "min_length",
            RuleCheck::MaxLength { .. } => "max_length",
            RuleCheck::MinValue { .. } => "min_value",
            RuleCheck::MaxValue { .. } => "max_value",
            RuleCheck::Regex { .. } => "regex",
            RuleCheck::DateRange { .. } => "date_range",
            RuleCheck::Enum { .. } => "enum",
            RuleCheck::Unknown => "unknown",
        }
    }
}

/// A validation rule: a check plus presentation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRule {
    #[serde(flatten)]
    pub check: RuleCheck,
    /// Message attached to failures; a default is derived when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub severity: Severity,
}

impl ValidationRule {
    pub fn new(check: RuleCheck) -> Self {
        Self {
            check,
            message: None,
            severity: Severity::Error,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Rules grouped by column. Order within a column only affects message
/// ordering: all rules are evaluated independently and unconditionally.
pub type RuleSet = IndexMap<String, Vec<ValidationRule>>;

/// Parse a rule set from JSON. Unknown rule kinds deserialize into
/// [`RuleCheck::Unknown`] rather than failing the whole set.
pub fn rule_set_from_json(json: &str) -> Result<RuleSet> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_serde_shape() {
        let rule = ValidationRule::new(RuleCheck::MinValue { min: 20.0 })
            .with_message("age must be at least 20");

        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"type\":\"min_value\""));
        assert!(json.contains("\"min\":20.0"));

        let back: ValidationRule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_unknown_kind_deserializes_to_catch_all() {
        let json = r#"{"cost": [{"type": "blake3_checksum", "severity": "warning"}]}"#;
        let rules = rule_set_from_json(json).unwrap();

        assert_eq!(rules["cost"][0].check, RuleCheck::Unknown);
        assert_eq!(rules["cost"][0].severity, Severity::Warning);
    }

    #[test]
    fn test_severity_defaults_to_error() {
        let json = r#"{"type": "required"}"#;
        let rule: ValidationRule = serde_json::from_str(json).unwrap();

        assert_eq!(rule.severity, Severity::Error);
        assert_eq!(rule.check.name(), "required");
    }
}
