//! Column type inference over schema-less records.

mod classifier;
mod profile;

pub use classifier::ColumnAnalyzer;
pub use profile::{ColumnProfile, ColumnType};

use indexmap::IndexMap;

use crate::record::{Record, column_names, field};

/// Infer a [`ColumnProfile`] for every column of the dataset.
///
/// Columns are the union of keys across all records; records missing a key
/// contribute a null for that column. Always returns a best-effort profile
/// per column, even for an empty dataset (no columns, empty map).
pub fn infer_column_types(records: &[Record]) -> IndexMap<String, ColumnProfile> {
    infer_with(records, &ColumnAnalyzer::new())
}

/// [`infer_column_types`] with a caller-configured analyzer.
pub fn infer_with(
    records: &[Record],
    analyzer: &ColumnAnalyzer,
) -> IndexMap<String, ColumnProfile> {
    let mut profiles = IndexMap::new();

    for column in column_names(records) {
        let values: Vec<&crate::record::Value> =
            records.iter().map(|r| field(r, &column)).collect();
        let profile = analyzer.analyze(&values);
        profiles.insert(column, profile);
    }

    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Value;

    fn make_records(rows: Vec<Vec<(&str, &str)>>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(k, v)| (k.to_string(), Value::from(v)))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_profiles_every_column() {
        let records = make_records(vec![
            vec![("name", "Alice"), ("age", "30")],
            vec![("name", "Bob"), ("age", "25")],
        ]);

        let profiles = infer_column_types(&records);

        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles["name"].inferred_type, ColumnType::String);
        assert_eq!(profiles["age"].inferred_type, ColumnType::Number);
    }

    #[test]
    fn test_missing_keys_count_as_nulls() {
        let records = make_records(vec![
            vec![("a", "x"), ("b", "7")],
            vec![("a", "y")],
            vec![("a", "z"), ("b", "9")],
        ]);

        let profiles = infer_column_types(&records);

        assert_eq!(profiles["b"].null_percentage, 33);
    }

    #[test]
    fn test_empty_dataset_yields_no_profiles() {
        let profiles = infer_column_types(&[]);
        assert!(profiles.is_empty());
    }
}
