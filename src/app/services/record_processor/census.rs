//! Connection-code census
//!
//! One pass over the full record set producing per-code occurrence counts and
//! the highest number observed per code prefix, both case-insensitive. The
//! census is a read-only snapshot; the deduplicator works on its own copy of
//! the prefix maxima.

use crate::app::models::CodedRecord;
use crate::app::services::normalization::{fold_case, non_blank};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// `<prefix>-<number>` with optional whitespace around the dash
const CODE_PATTERN: &str = r"^(?P<prefix>[^-]*?)\s*-\s*(?P<number>\+?[0-9]+)$";

static CODE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

/// Largest number a well-formed code may carry
pub const MAX_CODE_NUMBER: u64 = i32::MAX as u64;

/// A code split into its prefix and number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeShape<'a> {
    /// Trimmed text before the dash, as spelled in the record
    pub prefix: &'a str,
    pub number: u64,
}

/// Split a code of the form `<prefix>-<number>`
///
/// The prefix must be non-blank, the code must contain exactly one dash and
/// the number must lie in `0..=MAX_CODE_NUMBER`.
pub fn parse_code(code: &str) -> Option<CodeShape<'_>> {
    let regex = CODE_REGEX.get_or_init(|| Regex::new(CODE_PATTERN).ok()).as_ref()?;
    let captures = regex.captures(code.trim())?;

    let prefix = non_blank(captures.name("prefix")?.as_str())?;
    let number: u64 = captures.name("number")?.as_str().parse().ok()?;

    (number <= MAX_CODE_NUMBER).then_some(CodeShape { prefix, number })
}

/// Occurrence counts and per-prefix maxima over a record set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeCensus {
    /// Folded trimmed code to occurrence count
    counts: HashMap<String, usize>,

    /// Folded prefix to highest number observed
    prefix_max: HashMap<String, u64>,

    /// Records carrying a non-blank code
    coded_records: usize,
}

impl CodeCensus {
    /// Count every non-blank code in `records`
    pub fn build<R: CodedRecord>(records: &[R]) -> Self {
        let mut census = Self::default();

        for code in records
            .iter()
            .filter_map(|record| record.connection_code().and_then(non_blank))
        {
            census.coded_records += 1;
            *census.counts.entry(fold_case(code)).or_insert(0) += 1;

            if let Some(shape) = parse_code(code) {
                let max = census.prefix_max.entry(fold_case(shape.prefix)).or_insert(0);
                *max = (*max).max(shape.number);
            }
        }

        census
    }

    /// Occurrences of `code` (trimmed, case-insensitive)
    pub fn occurrences(&self, code: &str) -> usize {
        self.counts
            .get(&fold_case(code.trim()))
            .copied()
            .unwrap_or(0)
    }

    /// True when `code` appears anywhere in the counted records
    pub fn contains(&self, code: &str) -> bool {
        self.occurrences(code) > 0
    }

    pub(crate) fn contains_folded(&self, folded: &str) -> bool {
        self.counts.contains_key(folded)
    }

    pub(crate) fn occurrences_folded(&self, folded: &str) -> usize {
        self.counts.get(folded).copied().unwrap_or(0)
    }

    /// Highest number observed for `prefix` (case-insensitive)
    pub fn max_number(&self, prefix: &str) -> Option<u64> {
        self.prefix_max.get(&fold_case(prefix.trim())).copied()
    }

    /// Per-prefix maxima keyed by folded prefix
    pub fn prefix_maxima(&self) -> &HashMap<String, u64> {
        &self.prefix_max
    }

    /// Records that carried a non-blank code
    pub fn coded_records(&self) -> usize {
        self.coded_records
    }

    /// Distinct codes (case-insensitive)
    pub fn distinct_codes(&self) -> usize {
        self.counts.len()
    }

    /// Distinct codes occurring more than once
    pub fn duplicated_codes(&self) -> usize {
        self.counts.values().filter(|count| **count > 1).count()
    }
}
