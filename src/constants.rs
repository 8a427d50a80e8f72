//! Application constants for the connection processor
//!
//! This module contains record key names, header spellings, default file and
//! directory names, and processing defaults used throughout the application.

// =============================================================================
// Record Keys
// =============================================================================

/// JSON keys of a connection record, in serialization order
pub mod record_keys {
    pub const NAME: &str = "Name";
    pub const CONNECTION_CODE: &str = "CONNECTION_CODE";
    /// Accepted on input in addition to [`CONNECTION_CODE`]
    pub const CONNECTION_CODE_ALIAS: &str = "ConnectionCode";
    pub const PROFILE: &str = "Profile";

    pub const H: &str = "H";
    pub const B: &str = "B";
    pub const S: &str = "s";
    pub const T_GEOMETRY: &str = "t";

    /// Keys consulted when looking for a record's connection code
    pub const CODE_KEYS: &[&str] = &[CONNECTION_CODE, CONNECTION_CODE_ALIAS];
}

// =============================================================================
// Header Spellings
// =============================================================================

/// Accepted raw header spellings per canonical column.
///
/// Matching is case-insensitive, so the lists only need to carry spellings that
/// differ by more than case (Cyrillic look-alikes, legacy labels).
pub mod header_spellings {
    pub const NAME: &[&str] = &["Name"];
    pub const CONNECTION_CODE: &[&str] = &["CONNECTION_CODE", "Connection_Code", "Code", "Код"];
    pub const PROFILE: &[&str] = &["Profile", "Профиль"];

    // Cyrillic Н and В look identical to Latin H and B in most fonts
    pub const H: &[&str] = &["H", "Н"];
    pub const B: &[&str] = &["B", "В"];
    pub const S: &[&str] = &["s", "S"];
    pub const T_GEOMETRY: &[&str] = &["t", "T"];

    pub const NT: &[&str] = &["Nt"];
    pub const NC: &[&str] = &["Nc"];
    pub const N: &[&str] = &["N"];
    pub const QO: &[&str] = &["Qo"];
    pub const Q: &[&str] = &["Q"];
    pub const T: &[&str] = &["T"];
    pub const M: &[&str] = &["M"];
    pub const VARIABLE: &[&str] = &["variable", "Variable"];
    pub const SJ: &[&str] = &["Sj"];
    pub const SJO: &[&str] = &["Sjo"];
    pub const MNEG: &[&str] = &["Mneg"];
    pub const MO: &[&str] = &["Mo"];

    pub const ALPHA: &[&str] = &["α", "Alpha"];
    pub const BETA: &[&str] = &["β", "Beta"];
    pub const GAMMA: &[&str] = &["γ", "Gamma"];
    pub const DELTA: &[&str] = &["δ", "Delta"];
    pub const EPSILON: &[&str] = &["ε", "Epsilon"];
    pub const LAMBDA: &[&str] = &["λ", "Lambda"];
}

/// Header token that Greek coefficient labels degrade into after a lossy re-encode
pub const DEFAULT_COEFFICIENT_PLACEHOLDER: &str = "?";

/// Number of coefficient columns that follow `Mo` in a main table
pub const COEFFICIENT_COLUMN_COUNT: usize = 6;

/// Number of columns a profile-reference table occupies (Profile, H, B, s, t)
pub const PROFILE_TABLE_WIDTH: usize = 5;

// =============================================================================
// Directory and File Names
// =============================================================================

/// Directory holding the source tables
pub const DEFAULT_INPUT_DIR: &str = "EXCEL";

/// Directory holding the profile reference table
pub const DEFAULT_PROFILE_DIR: &str = "EXCEL_Profile";

/// Directory receiving one JSON file per converted table
pub const DEFAULT_JSON_OUT_DIR: &str = "JSON_OUT";

/// Directory receiving the merged dataset and audit reports
pub const DEFAULT_MERGED_DIR: &str = "JSON_All";

/// Directory receiving the sorted profile / code / name lists
pub const DEFAULT_EXPORT_DIR: &str = "EXCEL_Profile_OUT";

/// Profile reference file name (also excluded from conversion and merging)
pub const PROFILE_REFERENCE_FILE: &str = "Profile.json";

/// File stem identifying the profile reference table among inputs
pub const PROFILE_REFERENCE_STEM: &str = "Profile";

pub const MERGED_FILE: &str = "all.json";
pub const DEDUPLICATED_FILE: &str = "all_dedup.json";
pub const RENAME_REPORT_FILE: &str = "replacements.txt";
pub const DUPLICATES_REPORT_FILE: &str = "duplicates.txt";
pub const PROFILE_LIST_FILE: &str = "profile.txt";
pub const CODE_LIST_FILE: &str = "CONNECTION_CODE.txt";
pub const NAME_LIST_FILE: &str = "names.txt";

/// Table file extensions picked up from the input directory
pub const DEFAULT_INPUT_EXTENSIONS: &[&str] = &["tsv", "txt", "csv"];

// =============================================================================
// Processing Defaults
// =============================================================================

/// Rows scanned from the top of a table while looking for the header row
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 30;

/// Profile designation resolved as a sanity check after loading the lookup
pub const DEFAULT_SELF_CHECK_PROFILE: &str = "10Б1";

/// Maximum number of near-miss keys reported by the self-check
pub const SELF_CHECK_SAMPLE_LIMIT: usize = 10;

/// Name written for records without one in the name list export
pub const EMPTY_NAME_PLACEHOLDER: &str = "Empty";

/// Environment variable overriding the input directory
pub const ENV_INPUT_DIR: &str = "CONNECTION_PROCESSOR_INPUT";

/// Environment variable overriding the JSON output directory
pub const ENV_OUTPUT_DIR: &str = "CONNECTION_PROCESSOR_OUTPUT";

/// Application name used for the configuration directory
pub const APP_NAME: &str = "connection-processor";

/// Configuration file name inside the configuration directory
pub const CONFIG_FILE_NAME: &str = "config.json";
