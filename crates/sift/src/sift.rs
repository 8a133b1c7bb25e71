//! Main Sift struct and public API.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::clean::{CleaningAction, CleaningOptions, clean};
use crate::error::Result;
use crate::inference::{ColumnAnalyzer, ColumnProfile, infer_with};
use crate::record::Record;
use crate::rules::{RuleSet, generate_rules};
use crate::transform::{BatchedTransform, TargetTypes, TransformOutcome, TransformationSpec};
use crate::validation::{ValidationReport, evaluate};

/// Configuration for sift analysis.
#[derive(Debug, Clone)]
pub struct SiftConfig {
    /// Maximum values per column classified during type inference.
    pub sample_size: usize,
    /// Default chunk size for batched transforms.
    pub batch_size: usize,
}

impl Default for SiftConfig {
    fn default() -> Self {
        Self {
            sample_size: 100,
            batch_size: 1000,
        }
    }
}

/// Result of running the full refinement pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineResult {
    /// Inferred profile per column.
    pub profiles: IndexMap<String, ColumnProfile>,
    /// The rule set the dataset was validated against.
    pub rules: RuleSet,
    /// Validation outcome over the input dataset.
    pub report: ValidationReport,
    /// Cleaned records.
    pub records: Vec<Record>,
    /// Audit trail of cleaning actions.
    pub cleaning_log: Vec<CleaningAction>,
    /// Rows dropped by the cleaner.
    pub removed_count: usize,
}

/// The sift engine: type inference, rule generation, validation,
/// transformation, and cleaning over in-memory records.
///
/// Every method is a synchronous, stateless pure-data transform; nothing is
/// cached between calls and no I/O is performed.
pub struct Sift {
    config: SiftConfig,
}

impl Sift {
    /// Create a sift engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(SiftConfig::default())
    }

    /// Create a sift engine with custom configuration.
    pub fn with_config(config: SiftConfig) -> Self {
        Self { config }
    }

    /// Infer a column profile for every column of the dataset.
    pub fn infer_column_types(&self, records: &[Record]) -> IndexMap<String, ColumnProfile> {
        infer_with(
            records,
            &ColumnAnalyzer::with_sample_size(self.config.sample_size),
        )
    }

    /// Derive a default validation rule set from inferred profiles.
    pub fn generate_rules(&self, profiles: &IndexMap<String, ColumnProfile>) -> RuleSet {
        generate_rules(profiles)
    }

    /// Evaluate a rule set (generated or hand-authored) against a dataset.
    pub fn evaluate(&self, records: &[Record], rules: &RuleSet) -> Result<ValidationReport> {
        evaluate(records, rules)
    }

    /// Apply per-column transformation chains and target-type coercions.
    pub fn transform(
        &self,
        records: &[Record],
        spec: &TransformationSpec,
        target_types: &TargetTypes,
    ) -> Result<TransformOutcome> {
        crate::transform::transform(records, spec, target_types)
    }

    /// [`Sift::transform`] over configured-size chunks, with per-batch
    /// accounting.
    pub fn transform_batched(
        &self,
        records: &[Record],
        spec: &TransformationSpec,
        target_types: &TargetTypes,
    ) -> Result<BatchedTransform> {
        crate::transform::transform_batched(records, spec, target_types, self.config.batch_size)
    }

    /// Remove or patch rows per the validation report and cleaning policy.
    pub fn clean(
        &self,
        records: &[Record],
        report: &ValidationReport,
        options: &CleaningOptions,
    ) -> Result<crate::clean::CleaningOutcome> {
        clean(records, report, options)
    }

    /// The full pipeline: infer column types, generate a rule set, validate,
    /// and clean.
    ///
    /// Fails only on the caller contract violations of the underlying
    /// stages: an empty dataset, or a dataset whose profiles produce no
    /// rules at all.
    pub fn refine(&self, records: &[Record], options: &CleaningOptions) -> Result<RefineResult> {
        let profiles = self.infer_column_types(records);
        let rules = self.generate_rules(&profiles);
        let report = self.evaluate(records, &rules)?;
        let cleaned = self.clean(records, &report, options)?;

        Ok(RefineResult {
            profiles,
            rules,
            report,
            records: cleaned.records,
            cleaning_log: cleaned.log,
            removed_count: cleaned.removed_count,
        })
    }
}

impl Default for Sift {
    fn default() -> Self {
        Self::new()
    }
}
