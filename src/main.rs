use clap::Parser;
use connection_processor::cli::{
    args::Args,
    commands::{self, shared::print_summary},
};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    let Some(command) = args.command else {
        show_help_and_commands();
        process::exit(0);
    };

    let output_format = command.common().output_format;
    let result = commands::run(command).and_then(|report| print_summary(&report, output_format));

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Connection Processor - Structural Connection Table Normalizer");
    println!("=============================================================");
    println!();
    println!("Convert structural connection tables into JSON, patch profile geometry");
    println!("from a profile reference and rewrite duplicate connection codes.");
    println!();
    println!("USAGE:");
    println!("    connection_processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    run             Run every stage in order (main command)");
    println!("    convert         Convert source tables into one JSON file per table");
    println!("    apply-profiles  Patch profile geometry (H, B, s, t) into converted files");
    println!("    merge           Merge converted files and export sorted lists");
    println!("    duplicates      List connection codes that occur more than once");
    println!("    dedup           Rewrite duplicate connection codes");
    println!("    help            Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Run the full pipeline in the current project directory:");
    println!("    connection_processor run");
    println!();
    println!("    # Run against another project directory with progress details:");
    println!("    connection_processor run --root /path/to/project -v");
    println!();
    println!("    # Convert two tables only:");
    println!("    connection_processor convert EXCEL/beams.tsv EXCEL/columns.csv");
    println!();
    println!("    # Deduplicate a dataset and print the summary as JSON:");
    println!("    connection_processor dedup --input data.json --output-format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    connection_processor <COMMAND> --help");
}
