//! Connection-code deduplication
//!
//! Rewrites the code of every repeated occurrence of a duplicated code to a
//! fresh `<prefix>-<number>` value, in a single forward pass over the records
//! in their original order:
//!
//! - codes occurring once are untouched,
//! - the first occurrence of a duplicated code is untouched,
//! - later occurrences take `prefix-(max + 1)`, skipping any candidate that
//!   appears anywhere in the input or was assigned earlier in the pass,
//! - later occurrences of codes without the `<prefix>-<number>` shape, or
//!   whose prefix has no free number up to [`MAX_CODE_NUMBER`], are left
//!   duplicated and reported.

use crate::app::models::{CodedRecord, RenameEntry};
use crate::app::services::normalization::{fold_case, non_blank};
use indicatif::ProgressBar;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::census::{CodeCensus, MAX_CODE_NUMBER, parse_code};

/// Result of a deduplication pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeduplicationOutcome {
    /// One entry per rewritten record, in processing order
    pub renames: Vec<RenameEntry>,

    /// Repeated codes left unchanged for lacking the `<prefix>-<number>` shape
    /// or a free number under their prefix
    pub malformed_duplicates: Vec<String>,
}

impl DeduplicationOutcome {
    /// Number of records whose code was rewritten
    pub fn renamed(&self) -> usize {
        self.renames.len()
    }

    /// Rename report lines (`original => new`)
    pub fn report_lines(&self) -> Vec<String> {
        self.renames.iter().map(ToString::to_string).collect()
    }
}

/// Census the records, then deduplicate them in place
pub fn deduplicate<R: CodedRecord>(
    records: &mut [R],
    progress_bar: Option<&ProgressBar>,
) -> DeduplicationOutcome {
    let census = CodeCensus::build(records);
    deduplicate_codes(records, &census, progress_bar)
}

/// Deduplicate codes in place against a census of the same records
///
/// # Arguments
///
/// * `records` - Records in original order; codes are rewritten in place
/// * `census` - Census built from `records` before any rewrite
/// * `progress_bar` - Optional progress bar advanced once per record
///
/// # Returns
///
/// The ordered rename log and the repeated codes that could not be renamed
pub fn deduplicate_codes<R: CodedRecord>(
    records: &mut [R],
    census: &CodeCensus,
    progress_bar: Option<&ProgressBar>,
) -> DeduplicationOutcome {
    let mut outcome = DeduplicationOutcome::default();
    if records.is_empty() || census.duplicated_codes() == 0 {
        debug!("No duplicated connection codes, nothing to rename");
        return outcome;
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(census.distinct_codes());
    let mut prefix_max = census.prefix_maxima().clone();

    for record in records.iter_mut() {
        if let Some(pb) = progress_bar {
            pb.inc(1);
        }

        let Some(code) = record.connection_code().and_then(non_blank) else {
            continue;
        };
        let folded = fold_case(code);

        // First occurrence, or a code that is unique anyway
        if seen.insert(folded.clone()) || census.occurrences_folded(&folded) <= 1 {
            continue;
        }

        let Some(shape) = parse_code(code) else {
            warn!("Duplicate code '{}' has no <prefix>-<number> shape, left unchanged", code);
            outcome.malformed_duplicates.push(code.to_string());
            continue;
        };

        let folded_prefix = fold_case(shape.prefix);
        let start = prefix_max
            .get(&folded_prefix)
            .copied()
            .unwrap_or(shape.number)
            + 1;
        let Some((candidate, next)) = next_free_code(shape.prefix, start, &seen, census) else {
            warn!(
                "Duplicate code '{}' has no free number up to {}, left unchanged",
                code, MAX_CODE_NUMBER
            );
            outcome.malformed_duplicates.push(code.to_string());
            continue;
        };
        seen.insert(fold_case(&candidate));

        debug!("{} => {}", code, candidate);
        outcome.renames.push(RenameEntry::new(code, candidate.as_str()));
        prefix_max.insert(folded_prefix, next);
        record.set_connection_code(candidate);
    }

    info!(
        "Deduplication: {} codes renamed, {} malformed duplicates left unchanged",
        outcome.renames.len(),
        outcome.malformed_duplicates.len()
    );
    outcome
}

/// First `<prefix>-<n>` with `n >= start` unused in the input and in this pass
fn next_free_code(
    prefix: &str,
    start: u64,
    seen: &HashSet<String>,
    census: &CodeCensus,
) -> Option<(String, u64)> {
    (start..=MAX_CODE_NUMBER)
        .map(|number| (format!("{prefix}-{number}"), number))
        .find(|(candidate, _)| {
            let folded = fold_case(candidate);
            !seen.contains(&folded) && !census.contains_folded(&folded)
        })
}
