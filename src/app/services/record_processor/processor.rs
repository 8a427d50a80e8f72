//! Record processor and pipeline orchestration
//!
//! Runs a materialized record set through geometry enrichment, the duplicate
//! listing and code deduplication, in that order and without reordering
//! records.

use crate::app::models::{CodedRecord, ProfiledRecord};
use crate::app::services::profile_lookup::ProfileLookup;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use super::{
    census::CodeCensus,
    deduplication::deduplicate_codes,
    duplicates::find_duplicate_codes,
    enrichment::apply_profile_geometry,
    stats::{ProcessingResult, ProcessingStats},
};

/// Record processor for connection records
///
/// # Example
///
/// ```rust
/// use connection_processor::app::models::{ConnectionRecord, Geometry};
/// use connection_processor::app::services::profile_lookup::ProfileLookup;
/// use connection_processor::app::services::record_processor::RecordProcessor;
///
/// let lookup: ProfileLookup = [("20Б1", Geometry::new(200.0, 100.0, 5.6, 8.5))]
///     .into_iter()
///     .collect();
/// let records = vec![
///     ConnectionRecord { connection_code: "H2-1".into(), profile: "20Б1".into(), ..Default::default() },
///     ConnectionRecord { connection_code: "H2-1".into(), ..Default::default() },
/// ];
///
/// let result = RecordProcessor::new(Some(lookup)).process(records, false);
/// assert_eq!(result.records[1].connection_code, "H2-2");
/// assert_eq!(result.records[0].h, 200.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordProcessor {
    /// Profile lookup, enrichment is skipped without one
    lookup: Option<ProfileLookup>,
}

impl RecordProcessor {
    pub fn new(lookup: Option<ProfileLookup>) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> Option<&ProfileLookup> {
        self.lookup.as_ref()
    }

    /// Process records through the full pipeline
    ///
    /// 1. Geometry enrichment from the profile lookup, when present
    /// 2. Census and duplicate listing
    /// 3. Code deduplication
    pub fn process<R>(&self, mut records: Vec<R>, show_progress: bool) -> ProcessingResult<R>
    where
        R: CodedRecord + ProfiledRecord,
    {
        let mut stats = ProcessingStats::new();
        stats.total_input = records.len();

        info!("Starting record processing for {} records", records.len());

        if let Some(lookup) = self.lookup.as_ref().filter(|lookup| !lookup.is_empty()) {
            let pb = show_progress
                .then(|| create_processing_progress_bar(records.len() as u64, "Profiles"));
            let enrichment = apply_profile_geometry(&mut records, lookup, pb.as_ref());
            stats.profiles_patched = enrichment.patched;
            stats.profiles_unresolved = enrichment.unresolved;
            if let Some(pb) = pb {
                pb.finish_with_message(format!("{} profiles patched", enrichment.patched));
            }
        }

        let census = CodeCensus::build(&records);
        let duplicates = find_duplicate_codes(&records);
        stats.duplicate_occurrences = duplicates.len();

        let pb =
            show_progress.then(|| create_processing_progress_bar(records.len() as u64, "Codes"));
        let outcome = deduplicate_codes(&mut records, &census, pb.as_ref());
        stats.codes_renamed = outcome.renamed();
        stats.malformed_duplicates = outcome.malformed_duplicates.len();
        if let Some(pb) = pb {
            pb.finish_with_message(format!("{} codes renamed", outcome.renamed()));
        }

        info!("{}", stats.summary());

        ProcessingResult {
            records,
            renames: outcome.renames,
            duplicates,
            stats,
        }
    }
}

/// Progress bar for a record pass
pub fn create_processing_progress_bar(len: u64, stage: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{prefix:>10} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("##-"));
    }
    pb.set_prefix(stage.to_string());
    pb
}
