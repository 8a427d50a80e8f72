//! Command-line argument definitions for the connection processor
//!
//! This module defines the CLI interface using the clap derive API. Each
//! pipeline stage is a subcommand; `run` executes all of them in order.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the connection table processor
///
/// Converts structural connection tables into JSON, patches profile geometry,
/// merges the per-table files and rewrites duplicate connection codes.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "connection-processor",
    version,
    about = "Normalize structural connection tables into a consistent JSON dataset",
    long_about = "Reads tab- or comma-separated connection tables with unreliable headers, \
                  resolves their columns, patches profile geometry (H, B, s, t) from a \
                  profile reference, merges all tables into one dataset and rewrites \
                  duplicate CONNECTION_CODE values to fresh <prefix>-<number> codes with \
                  an audit trail."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Stage 1: convert source tables into one JSON file per table
    Convert(ConvertArgs),
    /// Stage 2: patch profile geometry into the converted JSON files
    ApplyProfiles(ApplyProfilesArgs),
    /// Stage 3: merge the converted JSON files and export sorted lists
    Merge(MergeArgs),
    /// List connection codes that occur more than once
    Duplicates(DuplicatesArgs),
    /// Rewrite duplicate connection codes and write the rename report
    Dedup(DedupArgs),
    /// Run every stage in order (default workflow)
    Run(RunArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CommonArgs {
    /// Path to configuration file
    ///
    /// JSON configuration file. If not specified, looks for
    /// <config dir>/connection-processor/config.json
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (JSON format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Project directory the relative default layout resolves against
    #[arg(
        short = 'r',
        long = "root",
        value_name = "DIR",
        help = "Project directory holding EXCEL/, JSON_OUT/, JSON_All/, ..."
    )]
    pub root: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings and hides progress bars.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the final summary
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for the summary"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the convert command
#[derive(Debug, Clone, Parser)]
pub struct ConvertArgs {
    /// Tables to convert instead of every table in the input directory
    ///
    /// A file named like the profile reference (`Profile.*`) is ignored.
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Directory holding the source tables
    #[arg(short = 'i', long = "input", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving one JSON file per table
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the apply-profiles command
#[derive(Debug, Clone, Parser)]
pub struct ApplyProfilesArgs {
    /// Directory holding Profile.json or the profile reference table
    #[arg(short = 'p', long = "profile-dir", value_name = "DIR")]
    pub profile_dir: Option<PathBuf>,

    /// Directory of converted JSON files to patch
    #[arg(short = 'j', long = "json-dir", value_name = "DIR")]
    pub json_dir: Option<PathBuf>,

    /// Profile designation resolved as a sanity check after loading
    #[arg(long = "self-check", value_name = "PROFILE")]
    pub self_check: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the merge command
#[derive(Debug, Clone, Parser)]
pub struct MergeArgs {
    /// Directory of converted JSON files to merge
    #[arg(short = 'j', long = "json-dir", value_name = "DIR")]
    pub json_dir: Option<PathBuf>,

    /// Directory receiving the merged dataset
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub merged_dir: Option<PathBuf>,

    /// Directory receiving the sorted profile, code and name lists
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the duplicates command
#[derive(Debug, Clone, Parser)]
pub struct DuplicatesArgs {
    /// Dataset to check, defaults to the merged dataset
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the duplicate list to this file as well
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the dedup command
#[derive(Debug, Clone, Parser)]
pub struct DedupArgs {
    /// Dataset to deduplicate, defaults to the merged dataset
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Deduplicated dataset, defaults to all_dedup.json next to the input
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Rename report (`original => new` per line)
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the run command
#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    /// Tables to convert instead of every table in the input directory
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format options for the final summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON format for scripting
    Json,
}

impl Commands {
    /// Options shared by every subcommand
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Convert(args) => &args.common,
            Commands::ApplyProfiles(args) => &args.common,
            Commands::Merge(args) => &args.common,
            Commands::Duplicates(args) => &args.common,
            Commands::Dedup(args) => &args.common,
            Commands::Run(args) => &args.common,
        }
    }

    /// Command name used in reports
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Convert(_) => "convert",
            Commands::ApplyProfiles(_) => "apply-profiles",
            Commands::Merge(_) => "merge",
            Commands::Duplicates(_) => "duplicates",
            Commands::Dedup(_) => "dedup",
            Commands::Run(_) => "run",
        }
    }
}

impl CommonArgs {
    /// Validate the shared arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let Some(root) = &self.root {
            if !root.is_dir() {
                return Err(Error::configuration(format!(
                    "Root is not a directory: {}",
                    root.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}
