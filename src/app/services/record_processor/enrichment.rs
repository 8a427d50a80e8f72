//! Profile geometry enrichment
//!
//! Applies resolved profile geometry onto records. Records whose profile is
//! blank or unresolved keep their geometry unchanged.

use crate::app::models::ProfiledRecord;
use crate::app::services::normalization::non_blank;
use crate::app::services::profile_lookup::{MatchTier, ProfileLookup};
use indicatif::ProgressBar;
use std::collections::HashMap;
use tracing::debug;

/// Counts from one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentOutcome {
    /// Records whose geometry was overwritten
    pub patched: usize,

    /// Records with a non-blank profile that no tier resolved
    pub unresolved: usize,

    /// Records without a profile
    pub blank: usize,

    /// Patched records per match tier
    pub by_tier: HashMap<MatchTier, usize>,

    /// Distinct unresolved profile designations, first-seen order
    pub unresolved_profiles: Vec<String>,
}

impl EnrichmentOutcome {
    /// Fold another pass into this one
    pub fn merge(&mut self, other: EnrichmentOutcome) {
        self.patched += other.patched;
        self.unresolved += other.unresolved;
        self.blank += other.blank;
        for (tier, count) in other.by_tier {
            *self.by_tier.entry(tier).or_insert(0) += count;
        }
        for profile in other.unresolved_profiles {
            if !self.unresolved_profiles.contains(&profile) {
                self.unresolved_profiles.push(profile);
            }
        }
    }
}

/// Overwrite H, B, s, t of every record whose profile resolves
///
/// # Arguments
///
/// * `records` - Records to patch in place
/// * `lookup` - Profile lookup to resolve against
/// * `progress_bar` - Optional progress bar advanced once per record
pub fn apply_profile_geometry<R: ProfiledRecord>(
    records: &mut [R],
    lookup: &ProfileLookup,
    progress_bar: Option<&ProgressBar>,
) -> EnrichmentOutcome {
    let mut outcome = EnrichmentOutcome::default();

    for record in records.iter_mut() {
        if let Some(pb) = progress_bar {
            pb.inc(1);
        }

        let Some(profile) = record.profile().and_then(non_blank) else {
            outcome.blank += 1;
            continue;
        };

        match lookup.resolve(profile) {
            Some(resolution) => {
                let geometry = resolution.geometry;
                *outcome.by_tier.entry(resolution.tier).or_insert(0) += 1;
                record.set_geometry(geometry);
                outcome.patched += 1;
            }
            None => {
                outcome.unresolved += 1;
                if !outcome.unresolved_profiles.iter().any(|known| known == profile) {
                    debug!("Profile '{}' not found in lookup", profile);
                    outcome.unresolved_profiles.push(profile.to_string());
                }
            }
        }
    }

    outcome
}
