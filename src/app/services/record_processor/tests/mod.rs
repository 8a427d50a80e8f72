//! Tests for the record processor module
//!
//! Census, deduplication, duplicate listing, enrichment and the pipeline.


use crate::app::models::{CodedRecord, ConnectionRecord, Geometry};
use crate::app::services::normalization::fold_case;
use crate::app::services::profile_lookup::ProfileLookup;
use std::collections::HashSet;

/// Record carrying only a code
pub fn create_test_record(code: &str) -> ConnectionRecord {
    ConnectionRecord {
        name: format!("Connection {code}"),
        connection_code: code.to_string(),
        ..Default::default()
    }
}

/// Record carrying a code and a profile
pub fn create_profiled_record(code: &str, profile: &str) -> ConnectionRecord {
    ConnectionRecord {
        profile: profile.to_string(),
        ..create_test_record(code)
    }
}

/// Records with the given codes, in order
pub fn create_records(codes: &[&str]) -> Vec<ConnectionRecord> {
    codes.iter().map(|code| create_test_record(code)).collect()
}

/// Codes of `records`, in order
pub fn codes_of<R: CodedRecord>(records: &[R]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.connection_code().unwrap_or_default().to_string())
        .collect()
}

/// True when no two non-blank codes are equal ignoring case
pub fn codes_are_unique<R: CodedRecord>(records: &[R]) -> bool {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|record| record.connection_code())
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .all(|code| seen.insert(fold_case(code)))
}

/// Small lookup with one profile per tier of interest
pub fn create_test_lookup() -> ProfileLookup {
    [
        ("10Б1", Geometry::new(100.0, 55.0, 4.1, 5.7)),
        ("20Б1", Geometry::new(200.0, 100.0, 5.6, 8.5)),
        ("30Ш1-В", Geometry::new(291.0, 200.0, 8.0, 11.0)),
    ]
    .into_iter()
    .collect()
}
