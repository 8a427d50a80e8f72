//! Duplicate connection-code listing

use crate::app::models::CodedRecord;
use crate::app::services::normalization::{fold_case, non_blank};
use std::collections::HashSet;

/// Every repeated occurrence of a code, in record order
///
/// Codes are trimmed and compared case-insensitively; a code occurring three
/// times is listed twice, spelled as in the repeating records.
pub fn find_duplicate_codes<R: CodedRecord>(records: &[R]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|record| record.connection_code().and_then(non_blank))
        .filter(|code| !seen.insert(fold_case(code)))
        .map(str::to_string)
        .collect()
}
