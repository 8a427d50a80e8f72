//! Record processing for connection records
//!
//! Runs materialized records through the algorithmic core of the pipeline:
//! profile geometry enrichment, the code census and code deduplication.
//!
//! # Architecture
//!
//! - [`processor`] - RecordProcessor and pipeline orchestration
//! - [`enrichment`] - Geometry patching from the profile lookup
//! - [`census`] - Occurrence counts and per-prefix maxima
//! - [`deduplication`] - Deterministic rewrite of repeated codes
//! - [`duplicates`] - Listing of repeated codes for audit
//! - [`stats`] - Processing statistics and result structures
//!
//! Every pass works on records in their input order. The first occurrence of a
//! code is never rewritten, so reordering records before deduplication changes
//! which records get renamed.

pub mod census;
pub mod deduplication;
pub mod duplicates;
pub mod enrichment;
pub mod processor;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use census::{CodeCensus, CodeShape, MAX_CODE_NUMBER, parse_code};
pub use deduplication::{DeduplicationOutcome, deduplicate, deduplicate_codes};
pub use duplicates::find_duplicate_codes;
pub use enrichment::{EnrichmentOutcome, apply_profile_geometry};
pub use processor::RecordProcessor;
pub use stats::{ProcessingResult, ProcessingStats};
