//! Run command: every stage in order
//!
//! convert, apply-profiles, merge, duplicates, dedup. A stage that fails
//! stops the run; stages with nothing to do pass empty results on.

use super::convert::convert_tables;
use super::dedup::{DedupPaths, deduplicate_dataset, list_duplicates, write_duplicates_report};
use super::merge::merge_tables;
use super::profiles::apply_profiles;
use super::shared::{CommandReport, load_configuration, setup_logging};
use crate::cli::args::RunArgs;
use crate::config::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

/// Run command runner
pub fn run_pipeline_command(args: RunArgs) -> Result<CommandReport> {
    setup_logging(&args.common)?;
    let config = load_configuration(&args.common)?;
    run_pipeline(&config, &args.files)
}

/// Run all stages against `config`
///
/// `files` replaces the input directory listing when non-empty.
pub fn run_pipeline(config: &Config, files: &[PathBuf]) -> Result<CommandReport> {
    let mut report = CommandReport::new("run");

    info!("Stage 1/5: convert");
    let convert = convert_tables(config, files).context("Convert stage failed")?;

    info!("Stage 2/5: apply profiles");
    let profiles = apply_profiles(config).context("Apply-profiles stage failed")?;

    info!("Stage 3/5: merge");
    let merge = merge_tables(config).context("Merge stage failed")?;

    info!("Stage 4/5: duplicates");
    let duplicates = list_duplicates(&config.merged_path());
    let duplicates_report = config.duplicates_report_path();
    write_duplicates_report(&duplicates_report, &duplicates)
        .context("Duplicates stage failed")?;

    info!("Stage 5/5: dedup");
    let (stats, dedup_outputs) = deduplicate_dataset(config, &DedupPaths::from_config(config))
        .context("Dedup stage failed")?;

    report.outputs.extend(merge.outputs.iter().cloned());
    report.outputs.push(duplicates_report);
    report.outputs.extend(dedup_outputs);

    report.convert = Some(convert);
    report.profiles = Some(profiles);
    report.merge = Some(merge);
    report.duplicates = Some(duplicates);
    report.dedup = Some(stats);

    info!("Pipeline complete");
    Ok(report.finish())
}
