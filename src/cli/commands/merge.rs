//! Merge command: concatenate converted JSON files and export sorted lists

use super::shared::{CommandReport, load_configuration, setup_logging};
use crate::app::adapters::filesystem::{merge_directory, write_json_pretty, write_lines};
use crate::app::services::exports::{distinct_codes, distinct_names, distinct_profiles};
use crate::cli::args::MergeArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of the merge stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    /// Records in the merged dataset
    pub records: usize,
    /// JSON files merged
    pub files: usize,
    /// JSON files skipped as unreadable
    pub skipped: Vec<String>,
    pub distinct_profiles: usize,
    pub distinct_codes: usize,
    pub distinct_names: usize,
    /// Merged dataset and exported lists
    pub outputs: Vec<PathBuf>,
}

/// Merge command runner
pub fn run_merge(args: MergeArgs) -> Result<CommandReport> {
    setup_logging(&args.common)?;
    info!("Starting merge");

    let mut config = load_configuration(&args.common)?;
    if let Some(json_dir) = &args.json_dir {
        config.paths.json_out_dir = json_dir.clone();
    }
    if let Some(merged_dir) = &args.merged_dir {
        config.paths.merged_dir = merged_dir.clone();
    }
    if let Some(export_dir) = &args.export_dir {
        config.paths.export_dir = export_dir.clone();
    }

    let mut report = CommandReport::new("merge");
    let summary = merge_tables(&config)?;
    report.outputs = summary.outputs.clone();
    report.merge = Some(summary);
    Ok(report.finish())
}

/// Merge every converted table into the merged dataset and export the
/// distinct profile, code and name lists
///
/// The profile reference JSON is never merged. An empty or missing JSON
/// directory produces an empty dataset.
pub fn merge_tables(config: &Config) -> Result<MergeSummary> {
    let json_dir = &config.paths.json_out_dir;
    let outcome = merge_directory(json_dir, &config.files.profile_reference);

    let merged_path = config.merged_path();
    write_json_pretty(&merged_path, &outcome.records)
        .with_context(|| format!("Failed to write {}", merged_path.display()))?;
    info!(
        "Merged {} records from {} files into {}",
        outcome.records.len(),
        outcome.files.len(),
        merged_path.display()
    );

    let profiles = distinct_profiles(&outcome.records);
    let codes = distinct_codes(&outcome.records);
    let names = distinct_names(&outcome.records);

    let export_dir = &config.paths.export_dir;
    let profile_list = export_dir.join(&config.files.profile_list);
    let code_list = export_dir.join(&config.files.code_list);
    let name_list = export_dir.join(&config.files.name_list);
    export_list(&profile_list, &profiles)?;
    export_list(&code_list, &codes)?;
    export_list(&name_list, &names)?;

    Ok(MergeSummary {
        records: outcome.records.len(),
        files: outcome.files.len(),
        skipped: outcome.skipped,
        distinct_profiles: profiles.len(),
        distinct_codes: codes.len(),
        distinct_names: names.len(),
        outputs: vec![merged_path, profile_list, code_list, name_list],
    })
}

fn export_list(path: &Path, lines: &[String]) -> Result<()> {
    write_lines(path, lines).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Written: {} ({} entries)", path.display(), lines.len());
    Ok(())
}
