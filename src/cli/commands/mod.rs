//! Command implementations for the connection processor CLI
//!
//! Each pipeline stage lives in its own module and exposes a runner taking its
//! parsed arguments plus a stage function taking a [`Config`](crate::Config),
//! which `run` chains together:
//! - `convert`: source tables to one JSON file per table
//! - `profiles`: profile geometry patching
//! - `merge`: merged dataset and sorted lists
//! - `dedup`: duplicate listing and code deduplication
//! - `pipeline`: every stage in order

pub mod convert;
pub mod dedup;
pub mod merge;
pub mod pipeline;
pub mod profiles;
pub mod shared;

pub use shared::CommandReport;

use crate::cli::args::Commands;
use anyhow::Result;

/// Dispatch a parsed subcommand to its runner
pub fn run(command: Commands) -> Result<CommandReport> {
    match command {
        Commands::Convert(args) => convert::run_convert(args),
        Commands::ApplyProfiles(args) => profiles::run_apply_profiles(args),
        Commands::Merge(args) => merge::run_merge(args),
        Commands::Duplicates(args) => dedup::run_duplicates(args),
        Commands::Dedup(args) => dedup::run_dedup(args),
        Commands::Run(args) => pipeline::run_pipeline_command(args),
    }
}
