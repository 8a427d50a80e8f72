//! Sorted value lists exported from the merged dataset
//!
//! Each list holds the distinct trimmed values of one key, ordered by code
//! point. Blank values are dropped, except for names where a blank name is
//! written as [`EMPTY_NAME_PLACEHOLDER`].

use crate::app::models::{CodedRecord, ProfiledRecord};
use crate::app::services::normalization::non_blank;
use crate::constants::{EMPTY_NAME_PLACEHOLDER, record_keys};
use serde_json::Value;
use std::collections::BTreeSet;

/// Distinct non-blank profile designations
pub fn distinct_profiles<R: ProfiledRecord>(records: &[R]) -> Vec<String> {
    sorted_distinct(
        records
            .iter()
            .filter_map(|record| record.profile().and_then(non_blank)),
    )
}

/// Distinct non-blank connection codes
///
/// Comparison is exact: `H2-1` and `h2-1` are listed separately.
pub fn distinct_codes<R: CodedRecord>(records: &[R]) -> Vec<String> {
    sorted_distinct(
        records
            .iter()
            .filter_map(|record| record.connection_code().and_then(non_blank)),
    )
}

/// Distinct record names of JSON objects
pub fn distinct_names(records: &[Value]) -> Vec<String> {
    sorted_distinct(
        records
            .iter()
            .filter_map(Value::as_object)
            .map(|object| {
                object
                    .get(record_keys::NAME)
                    .and_then(Value::as_str)
                    .and_then(non_blank)
                    .unwrap_or(EMPTY_NAME_PLACEHOLDER)
            }),
    )
}

fn sorted_distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn merged() -> Vec<Value> {
        vec![
            json!({ "Name": "Splice", "CONNECTION_CODE": "H2-2", "Profile": " 20Б1 " }),
            json!({ "Name": "  ", "CONNECTION_CODE": "H2-10", "Profile": "10Б1" }),
            json!({ "CONNECTION_CODE": "h2-1", "Profile": "" }),
            json!({ "Name": "Splice", "CONNECTION_CODE": " H2-2", "Profile": "20Б1" }),
            json!(42),
        ]
    }

    #[test]
    fn test_profiles_sorted_and_trimmed() {
        assert_eq!(distinct_profiles(&merged()), vec!["10Б1", "20Б1"]);
    }

    #[test]
    fn test_codes_sorted_by_code_point() {
        assert_eq!(distinct_codes(&merged()), vec!["H2-10", "H2-2", "h2-1"]);
    }

    #[test]
    fn test_blank_and_missing_names_become_placeholder() {
        assert_eq!(distinct_names(&merged()), vec!["Empty", "Splice"]);
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<Value> = Vec::new();
        assert!(distinct_profiles(&records).is_empty());
        assert!(distinct_names(&records).is_empty());
    }
}
