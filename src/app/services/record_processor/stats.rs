//! Processing statistics and result structures for the record pipeline

use crate::app::models::RenameEntry;
use serde::Serialize;

/// Statistics for one pass of the record pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    /// Number of input records
    pub total_input: usize,
    /// Records whose geometry was patched from the profile lookup
    pub profiles_patched: usize,
    /// Records whose non-blank profile did not resolve
    pub profiles_unresolved: usize,
    /// Repeated code occurrences found before deduplication
    pub duplicate_occurrences: usize,
    /// Records whose code was rewritten
    pub codes_renamed: usize,
    /// Repeated codes left duplicated for lacking the `<prefix>-<number>` shape
    pub malformed_duplicates: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of records with a resolved profile, as a percentage
    pub fn patch_rate(&self) -> f64 {
        if self.total_input == 0 {
            0.0
        } else {
            (self.profiles_patched as f64 / self.total_input as f64) * 100.0
        }
    }

    /// True when every code in the output is unique
    pub fn codes_unique(&self) -> bool {
        self.malformed_duplicates == 0
    }

    /// Get summary of processing statistics
    pub fn summary(&self) -> String {
        format!(
            "Processing Summary: {} records | Profiles patched: {} ({:.1}%), unresolved: {} | \
             Duplicates: {} | Renamed: {} | Malformed duplicates: {}",
            self.total_input,
            self.profiles_patched,
            self.patch_rate(),
            self.profiles_unresolved,
            self.duplicate_occurrences,
            self.codes_renamed,
            self.malformed_duplicates
        )
    }
}

/// Result of running records through the pipeline
#[derive(Debug, Clone)]
pub struct ProcessingResult<R> {
    /// Records with geometry patched and codes rewritten
    pub records: Vec<R>,
    /// Rename log in processing order
    pub renames: Vec<RenameEntry>,
    /// Codes found duplicated before deduplication, one per repeat
    pub duplicates: Vec<String>,
    pub stats: ProcessingStats,
}

impl<R> ProcessingResult<R> {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Get summary string for logging
    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
