//! Apply-profiles command: patch profile geometry into converted JSON files

use super::shared::{CommandReport, load_configuration, optional_progress_bar, setup_logging};
use crate::app::adapters::filesystem::{
    files_with_extensions, has_file_stem, json_files_in, patch_directory, write_json_pretty,
};
use crate::app::services::profile_lookup::{ProfileLookup, SelfCheck};
use crate::app::services::table_reader::TableReader;
use crate::cli::args::ApplyProfilesArgs;
use crate::config::Config;
use crate::constants::{PROFILE_REFERENCE_STEM, SELF_CHECK_SAMPLE_LIMIT, record_keys};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of the apply-profiles stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileSummary {
    pub profiles_loaded: usize,
    pub records_patched: usize,
    pub records_unresolved: usize,
    pub files_rewritten: usize,
    pub self_check_profile: String,
    pub self_check_found: bool,
    /// Distinct profile designations that no tier resolved
    pub unresolved_profiles: Vec<String>,
}

/// Apply-profiles command runner
pub fn run_apply_profiles(args: ApplyProfilesArgs) -> Result<CommandReport> {
    setup_logging(&args.common)?;
    info!("Starting profile geometry patching");

    let mut config = load_configuration(&args.common)?;
    if let Some(profile_dir) = &args.profile_dir {
        config.paths.profile_dir = profile_dir.clone();
    }
    if let Some(json_dir) = &args.json_dir {
        config.paths.json_out_dir = json_dir.clone();
    }
    if let Some(designation) = &args.self_check {
        config.processing.self_check_profile = designation.clone();
    }

    let mut report = CommandReport::new("apply-profiles");
    report.profiles = Some(apply_profiles(&config)?);
    Ok(report.finish())
}

/// Load the profile lookup for a run
///
/// `Profile.json` in the profile directory wins. Without it, the first table
/// named `Profile.*` in that directory is read and the reference JSON is
/// written next to it for later runs. Neither present yields an empty lookup.
pub fn load_profile_lookup(config: &Config) -> Result<ProfileLookup> {
    let json_path = config.profile_reference_path();
    if json_path.exists() {
        return Ok(ProfileLookup::load_json(&json_path));
    }

    let Some(table) = reference_table(config) else {
        warn!(
            "Profile reference not found: {} (no {}.* table either)",
            json_path.display(),
            PROFILE_REFERENCE_STEM
        );
        return Ok(ProfileLookup::new());
    };

    info!("Building profile reference from {}", table.display());
    let reader = TableReader::from_config(config);
    let lookup = ProfileLookup::from_reference_table(&table, &reader)
        .with_context(|| format!("Failed to read profile table {}", table.display()))?;

    write_json_pretty(&json_path, &reference_records(&lookup))
        .with_context(|| format!("Failed to write {}", json_path.display()))?;
    info!("Written: {} ({} profiles)", json_path.display(), lookup.len());
    Ok(lookup)
}

fn reference_table(config: &Config) -> Option<PathBuf> {
    files_with_extensions(&config.paths.profile_dir, &config.processing.input_extensions)
        .into_iter()
        .find(|path| has_file_stem(path, PROFILE_REFERENCE_STEM))
}

/// Lookup entries as reference objects `{Profile, H, B, s, t}`
fn reference_records(lookup: &ProfileLookup) -> Vec<Value> {
    lookup
        .iter()
        .map(|(key, geometry)| {
            let mut object = Map::new();
            object.insert(record_keys::PROFILE.to_string(), Value::from(key));
            for (field, value) in geometry.fields() {
                object.insert(field.to_string(), Value::from(value));
            }
            Value::Object(object)
        })
        .collect()
}

/// Patch geometry into every JSON file of the output directory
///
/// An empty lookup leaves the files untouched.
pub fn apply_profiles(config: &Config) -> Result<ProfileSummary> {
    let lookup = load_profile_lookup(config)?;
    let mut summary = ProfileSummary {
        profiles_loaded: lookup.len(),
        self_check_profile: config.processing.self_check_profile.clone(),
        ..Default::default()
    };

    if lookup.is_empty() {
        warn!("Profile lookup is empty, geometry left unchanged");
        return Ok(summary);
    }

    summary.self_check_found = matches!(
        lookup.self_check(&config.processing.self_check_profile, SELF_CHECK_SAMPLE_LIMIT),
        SelfCheck::Found { .. }
    );

    let json_dir = &config.paths.json_out_dir;
    let file_count = json_files_in(json_dir).len();
    let progress_bar = optional_progress_bar(config, file_count, "Patching profiles");
    let outcome = patch_directory(json_dir, &lookup, progress_bar.as_ref())
        .with_context(|| format!("Failed to patch {}", json_dir.display()))?;
    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!("{} files rewritten", outcome.files_rewritten));
    }

    info!(
        "Patched {} records in {} of {} files ({} unresolved)",
        outcome.enrichment.patched,
        outcome.files_rewritten,
        outcome.files_scanned,
        outcome.enrichment.unresolved
    );
    for profile in &outcome.enrichment.unresolved_profiles {
        warn!("Profile not found in lookup: {}", profile);
    }

    summary.records_patched = outcome.enrichment.patched;
    summary.records_unresolved = outcome.enrichment.unresolved;
    summary.files_rewritten = outcome.files_rewritten;
    summary.unresolved_profiles = outcome.enrichment.unresolved_profiles;
    Ok(summary)
}
