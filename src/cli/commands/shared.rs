//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, progress bars and the final
//! summary printed by every command.

use crate::app::services::record_processor::ProcessingStats;
use crate::cli::args::{CommonArgs, OutputFormat};
use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::convert::ConvertSummary;
use super::merge::MergeSummary;
use super::profiles::ProfileSummary;

/// Outcome of one command, printed as the final summary
#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub started_at: DateTime<Local>,
    #[serde(skip)]
    started: Instant,
    pub elapsed_seconds: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub convert: Option<ConvertSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profiles: Option<ProfileSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge: Option<MergeSummary>,
    /// Repeated code occurrences found by the duplicate check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup: Option<ProcessingStats>,

    /// Files written by the command
    pub outputs: Vec<PathBuf>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            started_at: Local::now(),
            started: Instant::now(),
            elapsed_seconds: 0.0,
            convert: None,
            profiles: None,
            merge: None,
            duplicates: None,
            dedup: None,
            outputs: Vec::new(),
        }
    }

    /// Stamp the elapsed time
    pub fn finish(mut self) -> Self {
        self.elapsed_seconds = self.started.elapsed().as_secs_f64();
        self
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_seconds)
    }
}

/// Set up structured logging
///
/// `RUST_LOG` wins over the verbosity flags.
pub fn setup_logging(args: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("connection_processor={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to initialize logging")?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (defaults -> file -> env -> args)
///
/// Command-specific directory overrides are applied by each command.
pub fn load_configuration(args: &CommonArgs) -> Result<Config> {
    args.validate()?;

    let default_config_path = if args.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_deref()
            .filter(|path| path.exists()),
    };

    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file found, using defaults and environment variables"),
    }

    let mut config = Config::load_layered(config_file).with_context(|| match config_file {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration".to_string(),
    })?;

    apply_cli_overrides(&mut config, args);
    config.validate().context("Invalid configuration")?;

    debug!("Loaded configuration: {:?}", config);
    Ok(config)
}

/// Apply the shared CLI overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &CommonArgs) {
    if let Some(root) = &args.root {
        *config = std::mem::take(config).rooted_at(root);
    }
    if !args.show_progress() {
        config.processing.show_progress = false;
    }
}

/// Progress bar over a list of files
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// Progress bar when enabled in configuration
pub fn optional_progress_bar(config: &Config, total: usize, message: &str) -> Option<ProgressBar> {
    (config.processing.show_progress && total > 0)
        .then(|| create_progress_bar(total as u64, message))
}

/// Print the final summary in the requested format
pub fn print_summary(report: &CommandReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            print_human_summary(report);
            Ok(())
        }
        OutputFormat::Json => {
            let text =
                serde_json::to_string_pretty(report).context("Failed to serialize summary")?;
            println!("{}", text);
            Ok(())
        }
    }
}

fn print_human_summary(report: &CommandReport) {
    println!(
        "\n{} {}",
        "Connection processor:".bright_green().bold(),
        report.command.bright_white().bold()
    );
    println!(
        "  {} {}",
        "Started:".bright_cyan(),
        report.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(report.elapsed())
    );

    if let Some(convert) = &report.convert {
        println!(
            "  {} {} tables, {} records",
            "Converted:".bright_cyan(),
            convert.tables.len().to_string().bright_white(),
            convert.records().to_string().bright_white()
        );
        if !convert.failed.is_empty() {
            println!(
                "  {} {}",
                "Tables failed:".bright_red(),
                convert.failed.join(", ").bright_red().bold()
            );
        }
    }

    if let Some(profiles) = &report.profiles {
        println!(
            "  {} {} loaded, {} records patched in {} files, {} unresolved",
            "Profiles:".bright_cyan(),
            profiles.profiles_loaded.to_string().bright_white(),
            profiles.records_patched.to_string().bright_white(),
            profiles.files_rewritten,
            profiles.records_unresolved
        );
        if !profiles.self_check_found {
            println!(
                "  {} {}",
                "Self-check failed for".bright_yellow(),
                profiles.self_check_profile.bright_yellow().bold()
            );
        }
    }

    if let Some(merge) = &report.merge {
        println!(
            "  {} {} records from {} files",
            "Merged:".bright_cyan(),
            merge.records.to_string().bright_white().bold(),
            merge.files
        );
        if !merge.skipped.is_empty() {
            println!(
                "  {} {}",
                "Merge skipped:".bright_yellow(),
                merge.skipped.join(", ")
            );
        }
    }

    if let Some(duplicates) = &report.duplicates {
        let count = duplicates.len().to_string();
        let count = if duplicates.is_empty() {
            count.bright_white()
        } else {
            count.bright_yellow().bold()
        };
        println!("  {} {}", "Duplicate occurrences:".bright_cyan(), count);
    }

    if let Some(stats) = &report.dedup {
        println!(
            "  {} {}",
            "Codes renamed:".bright_cyan(),
            stats.codes_renamed.to_string().bright_white().bold()
        );
        if stats.malformed_duplicates > 0 {
            println!(
                "  {} {}",
                "Malformed duplicates left unchanged:".bright_red(),
                stats.malformed_duplicates.to_string().bright_red().bold()
            );
        }
    }

    if !report.outputs.is_empty() {
        println!("  {}", "Output files:".bright_cyan());
        for path in &report.outputs {
            println!("    {}", path.display());
        }
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_report_serializes_present_sections_only() {
        let mut report = CommandReport::new("duplicates");
        report.duplicates = Some(vec!["Misc".to_string()]);
        let report = report.finish();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["command"], "duplicates");
        assert_eq!(value["duplicates"][0], "Misc");
        assert!(value.get("merge").is_none());
        assert!(value.get("started").is_none());
    }

    #[test]
    fn test_cli_overrides_root_and_quiet() {
        let mut config = Config::default();
        let args = CommonArgs {
            root: Some(PathBuf::from("/project")),
            quiet: true,
            ..Default::default()
        };

        apply_cli_overrides(&mut config, &args);

        assert_eq!(config.merged_path(), Path::new("/project/JSON_All/all.json"));
        assert!(!config.processing.show_progress);
        assert!(optional_progress_bar(&config, 10, "x").is_none());
    }
}
