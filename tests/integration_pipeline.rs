//! Integration tests for the staged pipeline
//!
//! Builds a project directory with source tables and a profile reference
//! table, runs every stage and checks the files each stage leaves behind.

use connection_processor::Config;
use connection_processor::app::adapters::filesystem::read_record_array;
use connection_processor::cli::commands::pipeline::run_pipeline;
use connection_processor::cli::commands::{convert, dedup, merge, profiles};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BEAMS: &str = "Beam connections\n\
Name\tCONNECTION_CODE\tProfile\tH\tB\ts\tt\tMo\t?\t?\t?\t?\t?\t?\n\
Splice\tH2-1\t20Б1\t\t\t\t\t12,5\t1\t2\t3\t4\t5\t6\n\
\t\t\t\t\t\t\t\t\t\t\t\t\t\n\
Splice\tH2-1\t20б1\t\t\t\t\t1 000\t0\t0\t0\t0\t0\t0\n\
Joint\t\t10Б1\t\t\t\t\t\t\t\t\t\t\t\n";

const COLUMNS: &str = "Name,CONNECTION_CODE,Profile\n\
Column,h2-2,30Ш1\n\
Column,H2-1,\n";

const PROFILES: &str = "Profile\tH\tB\ts\tt\n\
10Б1\t100\t55\t4,1\t5,7\n\
20Б1\t200\t100\t5,6\t8,5\n\
30Ш1\t291\t200\t8\t11\n";

fn project() -> (TempDir, Config) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::default()
        .rooted_at(temp_dir.path())
        .without_progress();

    fs::create_dir_all(&config.paths.input_dir).unwrap();
    fs::create_dir_all(&config.paths.profile_dir).unwrap();
    fs::write(config.paths.input_dir.join("beams.tsv"), BEAMS).unwrap();
    fs::write(config.paths.input_dir.join("columns.csv"), COLUMNS).unwrap();
    // A reference table among the inputs is not a connection table
    fs::write(config.paths.input_dir.join("Profile.tsv"), PROFILES).unwrap();
    fs::write(config.paths.profile_dir.join("Profile.tsv"), PROFILES).unwrap();

    (temp_dir, config)
}

fn codes(path: &Path) -> Vec<String> {
    read_record_array(path)
        .unwrap()
        .iter()
        .filter_map(|record| record["CONNECTION_CODE"].as_str().map(str::to_string))
        .collect()
}

#[test]
fn test_full_pipeline() {
    let (_temp_dir, config) = project();

    let report = run_pipeline(&config, &[]).unwrap();

    let convert = report.convert.as_ref().unwrap();
    assert_eq!(
        convert.tables,
        vec![("beams.tsv".to_string(), 2), ("columns.csv".to_string(), 2)]
    );
    assert!(convert.failed.is_empty());

    let profiles = report.profiles.as_ref().unwrap();
    assert_eq!(profiles.profiles_loaded, 3);
    assert!(profiles.self_check_found);
    assert_eq!(profiles.records_patched, 3);
    assert_eq!(profiles.records_unresolved, 0);
    assert!(config.profile_reference_path().exists());

    let merge = report.merge.as_ref().unwrap();
    assert_eq!(merge.records, 4);
    assert_eq!(merge.files, 2);

    assert_eq!(
        report.duplicates.as_deref().unwrap(),
        &["H2-1".to_string(), "H2-1".to_string()]
    );

    let stats = report.dedup.as_ref().unwrap();
    assert_eq!(stats.codes_renamed, 2);
    assert_eq!(stats.malformed_duplicates, 0);

    assert_eq!(codes(&config.merged_path()), vec!["H2-1", "H2-1", "h2-2", "H2-1"]);
    assert_eq!(
        codes(&config.deduplicated_path()),
        vec!["H2-1", "H2-3", "h2-2", "H2-4"]
    );
    assert_eq!(
        fs::read_to_string(config.rename_report_path()).unwrap(),
        "H2-1 => H2-3\nH2-1 => H2-4\n"
    );
    assert_eq!(
        fs::read_to_string(config.duplicates_report_path()).unwrap(),
        "H2-1\nH2-1\n"
    );
}

#[test]
fn test_converted_records_carry_parsed_values_and_geometry() {
    let (_temp_dir, config) = project();
    run_pipeline(&config, &[]).unwrap();

    let records = read_record_array(&config.deduplicated_path()).unwrap();

    assert_eq!(records[0]["Name"], "Splice");
    assert_eq!(records[0]["Mo"], 12.5);
    assert_eq!(records[0]["α"], 1.0);
    assert_eq!(records[0]["λ"], 6.0);
    assert_eq!(records[0]["H"], 200.0);
    assert_eq!(records[1]["Mo"], 1000.0);
    assert_eq!(records[1]["t"], 8.5);
    assert_eq!(records[2]["s"], 8.0);
    assert_eq!(records[3]["H"], 0.0);
}

#[test]
fn test_exported_lists() {
    let (_temp_dir, config) = project();
    run_pipeline(&config, &[]).unwrap();

    let read = |name: &str| fs::read_to_string(config.paths.export_dir.join(name)).unwrap();
    assert_eq!(read("profile.txt"), "20Б1\n20б1\n30Ш1\n");
    assert_eq!(read("CONNECTION_CODE.txt"), "H2-1\nh2-2\n");
    assert_eq!(read("names.txt"), "Column\nSplice\n");
}

#[test]
fn test_rerun_produces_identical_output() {
    let (_temp_dir, config) = project();

    run_pipeline(&config, &[]).unwrap();
    let first = fs::read_to_string(config.deduplicated_path()).unwrap();

    // Second run loads the reference JSON written by the first
    let report = run_pipeline(&config, &[]).unwrap();
    let second = fs::read_to_string(config.deduplicated_path()).unwrap();

    assert_eq!(first, second);
    assert_eq!(report.profiles.unwrap().profiles_loaded, 3);
}

#[test]
fn test_stages_run_individually() {
    let (_temp_dir, config) = project();

    let beams = config.paths.input_dir.join("beams.tsv");
    let summary = convert::convert_tables(&config, &[beams]).unwrap();
    assert_eq!(summary.records(), 2);

    let profiles = profiles::apply_profiles(&config).unwrap();
    assert_eq!(profiles.records_patched, 2);
    assert_eq!(profiles.files_rewritten, 1);

    let merged = merge::merge_tables(&config).unwrap();
    assert_eq!(merged.records, 2);
    assert_eq!(merged.distinct_codes, 1);

    let (stats, _) =
        dedup::deduplicate_dataset(&config, &dedup::DedupPaths::from_config(&config)).unwrap();
    assert_eq!(stats.codes_renamed, 1);
    assert_eq!(codes(&config.deduplicated_path()), vec!["H2-1", "H2-2"]);
}

#[test]
fn test_empty_project_runs_without_outputs_to_patch() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::default()
        .rooted_at(temp_dir.path())
        .without_progress();

    let report = run_pipeline(&config, &[]).unwrap();

    assert!(report.convert.unwrap().tables.is_empty());
    assert_eq!(report.profiles.unwrap().profiles_loaded, 0);
    assert_eq!(report.merge.unwrap().records, 0);
    assert_eq!(report.dedup.unwrap().codes_renamed, 0);
    assert_eq!(fs::read_to_string(config.merged_path()).unwrap(), "[]\n");
}
