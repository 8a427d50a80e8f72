//! Duplicate listing and code deduplication commands
//!
//! Both work on the merged dataset. `duplicates` only reports; `dedup`
//! rewrites repeated codes to fresh `<prefix>-<number>` codes and writes the
//! rename report next to the deduplicated dataset.

use super::shared::{CommandReport, load_configuration, setup_logging};
use crate::app::adapters::filesystem::{read_record_array, write_json_pretty, write_lines};
use crate::app::services::record_processor::{
    ProcessingStats, RecordProcessor, find_duplicate_codes,
};
use crate::cli::args::{DedupArgs, DuplicatesArgs};
use crate::config::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Duplicates command runner
pub fn run_duplicates(args: DuplicatesArgs) -> Result<CommandReport> {
    setup_logging(&args.common)?;
    info!("Starting duplicate code check");

    let config = load_configuration(&args.common)?;
    let input = args.input.clone().unwrap_or_else(|| config.merged_path());

    let mut report = CommandReport::new("duplicates");
    let duplicates = list_duplicates(&input);
    if let Some(path) = &args.report {
        write_duplicates_report(path, &duplicates)?;
        report.outputs.push(path.clone());
    }
    report.duplicates = Some(duplicates);
    Ok(report.finish())
}

/// Every repeated code occurrence in the dataset at `input`
///
/// A missing or unreadable dataset has no duplicates.
pub fn list_duplicates(input: &Path) -> Vec<String> {
    let records = read_record_array(input).unwrap_or_default();
    let duplicates = find_duplicate_codes(&records);

    if duplicates.is_empty() {
        info!("No duplicate codes in {}", input.display());
    } else {
        warn!(
            "{} repeated code occurrences in {}",
            duplicates.len(),
            input.display()
        );
        for code in &duplicates {
            info!("  duplicate: {}", code);
        }
    }
    duplicates
}

/// Write one duplicate occurrence per line
pub fn write_duplicates_report(path: &Path, duplicates: &[String]) -> Result<()> {
    write_lines(path, duplicates).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Written: {}", path.display());
    Ok(())
}

/// Dedup command runner
pub fn run_dedup(args: DedupArgs) -> Result<CommandReport> {
    setup_logging(&args.common)?;
    info!("Starting code deduplication");

    let config = load_configuration(&args.common)?;
    let paths = DedupPaths {
        input: args.input.clone().unwrap_or_else(|| config.merged_path()),
        output: args.output.clone(),
        report: args.report.clone(),
    };

    let mut report = CommandReport::new("dedup");
    let (stats, outputs) = deduplicate_dataset(&config, &paths)?;
    report.dedup = Some(stats);
    report.outputs = outputs;
    Ok(report.finish())
}

/// Input and output files of a deduplication run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupPaths {
    pub input: PathBuf,
    /// Defaults to the deduplicated file name next to the input
    pub output: Option<PathBuf>,
    /// Defaults to the rename report name next to the input
    pub report: Option<PathBuf>,
}

impl DedupPaths {
    /// Paths of the configured merged dataset
    pub fn from_config(config: &Config) -> Self {
        Self {
            input: config.merged_path(),
            output: Some(config.deduplicated_path()),
            report: Some(config.rename_report_path()),
        }
    }

    fn output_path(&self, config: &Config) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.sibling(&config.files.deduplicated))
    }

    fn report_path(&self, config: &Config) -> PathBuf {
        self.report
            .clone()
            .unwrap_or_else(|| self.sibling(&config.files.rename_report))
    }

    fn sibling(&self, name: &str) -> PathBuf {
        self.input
            .parent()
            .map(|dir| dir.join(name))
            .unwrap_or_else(|| PathBuf::from(name))
    }
}

/// Rewrite duplicate codes of the dataset and write the dataset and the
/// rename report
///
/// A missing dataset is left alone: nothing is renamed and nothing written.
///
/// # Errors
/// Fails when the deduplicated dataset or the rename report cannot be written.
pub fn deduplicate_dataset(
    config: &Config,
    paths: &DedupPaths,
) -> Result<(ProcessingStats, Vec<PathBuf>)> {
    let Some(records) = read_record_array(&paths.input) else {
        warn!(
            "Merged dataset not found or unreadable: {}, nothing to deduplicate",
            paths.input.display()
        );
        return Ok((ProcessingStats::default(), Vec::new()));
    };

    let result = RecordProcessor::new(None).process(records, config.processing.show_progress);
    info!("{}", result.summary());

    let output = paths.output_path(config);
    write_json_pretty(&output, &result.records)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Written: {} ({} records)", output.display(), result.record_count());

    let report = paths.report_path(config);
    write_lines(&report, result.renames.iter().map(ToString::to_string))
        .with_context(|| format!("Failed to write {}", report.display()))?;
    info!("Written: {} ({} renames)", report.display(), result.renames.len());

    if !result.stats.codes_unique() {
        warn!(
            "{} duplicate codes lack the <prefix>-<number> shape or a free number and were left unchanged",
            result.stats.malformed_duplicates
        );
    }

    Ok((result.stats, vec![output, report]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn merged_config(temp_dir: &TempDir, records: &str) -> Config {
        let config = Config::default().rooted_at(temp_dir.path()).without_progress();
        fs::create_dir_all(&config.paths.merged_dir).unwrap();
        fs::write(config.merged_path(), records).unwrap();
        config
    }

    #[test]
    fn test_list_duplicates_of_merged_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let config = merged_config(
            &temp_dir,
            r#"[{"CONNECTION_CODE": "H2-1"}, {"CONNECTION_CODE": "h2-1 "},
                {"CONNECTION_CODE": "Misc"}, {"CONNECTION_CODE": "Misc"}]"#,
        );

        assert_eq!(list_duplicates(&config.merged_path()), vec!["h2-1", "Misc"]);
        assert!(list_duplicates(&temp_dir.path().join("missing.json")).is_empty());
    }

    #[test]
    fn test_deduplicate_dataset_writes_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let config = merged_config(
            &temp_dir,
            r#"[{"Name": "a", "CONNECTION_CODE": "H2-1"},
                {"Name": "b", "CONNECTION_CODE": "H2-1"},
                {"Name": "c", "CONNECTION_CODE": "H2-2"}]"#,
        );

        let (stats, outputs) =
            deduplicate_dataset(&config, &DedupPaths::from_config(&config)).unwrap();

        assert_eq!(stats.codes_renamed, 1);
        assert_eq!(outputs, vec![config.deduplicated_path(), config.rename_report_path()]);

        let records = read_record_array(&config.deduplicated_path()).unwrap();
        let codes: Vec<&str> = records
            .iter()
            .filter_map(|record| record["CONNECTION_CODE"].as_str())
            .collect();
        assert_eq!(codes, vec!["H2-1", "H2-3", "H2-2"]);
        assert_eq!(records[1]["Name"], "b");
        assert_eq!(
            fs::read_to_string(config.rename_report_path()).unwrap(),
            "H2-1 => H2-3\n"
        );
    }

    #[test]
    fn test_outputs_default_next_to_input() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default().without_progress();
        let input = temp_dir.path().join("data.json");
        fs::write(&input, r#"[{"CONNECTION_CODE": "A-1"}]"#).unwrap();

        let paths = DedupPaths {
            input,
            output: None,
            report: None,
        };
        let (stats, outputs) = deduplicate_dataset(&config, &paths).unwrap();

        assert_eq!(stats.codes_renamed, 0);
        assert_eq!(
            outputs,
            vec![
                temp_dir.path().join("all_dedup.json"),
                temp_dir.path().join("replacements.txt")
            ]
        );
        assert_eq!(fs::read_to_string(&outputs[1]).unwrap(), "");
    }

    #[test]
    fn test_missing_dataset_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default().rooted_at(temp_dir.path()).without_progress();

        let (stats, outputs) =
            deduplicate_dataset(&config, &DedupPaths::from_config(&config)).unwrap();

        assert_eq!(stats, ProcessingStats::default());
        assert!(outputs.is_empty());
        assert!(!config.deduplicated_path().exists());
    }
}
