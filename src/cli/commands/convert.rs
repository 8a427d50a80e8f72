//! Convert command: source tables to one JSON file per table
//!
//! The JSON output directory is cleared of `*.json` files first, so a rerun
//! never merges stale tables. Tables whose header cannot be interpreted abort
//! the command; other unreadable tables are reported and skipped.

use super::shared::{CommandReport, load_configuration, optional_progress_bar, setup_logging};
use crate::app::adapters::filesystem::{
    clear_json_files, ensure_directory, files_with_extensions, has_file_stem, write_json_pretty,
};
use crate::app::services::table_reader::TableReader;
use crate::cli::args::ConvertArgs;
use crate::config::Config;
use crate::constants::PROFILE_REFERENCE_STEM;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Outcome of the convert stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConvertSummary {
    /// Converted table names with their record count
    pub tables: Vec<(String, usize)>,
    /// Tables that could not be read
    pub failed: Vec<String>,
    /// JSON files written
    pub outputs: Vec<PathBuf>,
}

impl ConvertSummary {
    /// Records written across all tables
    pub fn records(&self) -> usize {
        self.tables.iter().map(|(_, count)| count).sum()
    }
}

/// Convert command runner
pub fn run_convert(args: ConvertArgs) -> Result<CommandReport> {
    setup_logging(&args.common)?;
    info!("Starting table conversion");

    let mut config = load_configuration(&args.common)?;
    if let Some(input_dir) = &args.input_dir {
        config.paths.input_dir = input_dir.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.paths.json_out_dir = output_dir.clone();
    }

    let mut report = CommandReport::new("convert");
    let summary = convert_tables(&config, &args.files)?;
    report.outputs = summary.outputs.clone();
    report.convert = Some(summary);
    Ok(report.finish())
}

/// Source tables for this run
///
/// Explicit files win over the input directory. The profile reference table
/// is never converted as a connection table.
pub fn input_tables(config: &Config, files: &[PathBuf]) -> Vec<PathBuf> {
    let candidates = if files.is_empty() {
        let dir = &config.paths.input_dir;
        if !dir.is_dir() {
            warn!("Input folder not found: {}", dir.display());
        }
        files_with_extensions(dir, &config.processing.input_extensions)
    } else {
        files.to_vec()
    };

    candidates
        .into_iter()
        .filter(|path| {
            let is_reference = has_file_stem(path, PROFILE_REFERENCE_STEM);
            if is_reference {
                debug!("Skipping profile reference {}", path.display());
            }
            !is_reference
        })
        .collect()
}

/// Convert every input table into `<json_out_dir>/<stem>.json`
///
/// # Errors
/// Fails when the output directory cannot be prepared, a JSON file cannot be
/// written, or a table header matches neither table shape.
pub fn convert_tables(config: &Config, files: &[PathBuf]) -> Result<ConvertSummary> {
    let out_dir = &config.paths.json_out_dir;
    ensure_directory(out_dir)?;
    let removed = clear_json_files(out_dir);
    debug!("Removed {} stale JSON files from {}", removed, out_dir.display());

    let tables = input_tables(config, files);
    info!("Converting {} tables", tables.len());

    let reader = TableReader::from_config(config);
    let progress_bar = optional_progress_bar(config, tables.len(), "Converting tables");
    let mut summary = ConvertSummary::default();

    for path in &tables {
        if let Some(pb) = &progress_bar {
            pb.set_message(table_name(path));
        }

        if !path.is_file() {
            warn!("Table not found: {}", path.display());
            summary.failed.push(table_name(path));
            continue;
        }

        match reader.read_path(path) {
            Ok(table) => {
                let output = output_path(out_dir, path);
                write_json_pretty(&output, &table.records)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                info!("Written: {}", output.display());
                summary.tables.push((table.name, table.records.len()));
                summary.outputs.push(output);
            }
            Err(e) if e.is_schema_error() => {
                return Err(e).with_context(|| format!("Cannot interpret {}", path.display()));
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                summary.failed.push(table_name(path));
            }
        }

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress_bar {
        pb.finish_with_message(format!("Converted {} tables", summary.tables.len()));
    }

    info!(
        "Conversion complete: {} tables, {} records, {} failed",
        summary.tables.len(),
        summary.records(),
        summary.failed.len()
    );
    Ok(summary)
}

fn output_path(out_dir: &Path, table: &Path) -> PathBuf {
    let stem = table
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());
    out_dir.join(format!("{stem}.json"))
}

fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
