//! Filesystem adapter for the staged pipeline
//!
//! Directory discovery, reading and writing JSON record arrays and line files,
//! merging a directory of per-table arrays and patching profile geometry into
//! a directory of JSON files. Every stage tolerates absent inputs: a missing
//! directory is an empty directory and an unreadable JSON file is skipped.

use crate::app::services::normalization::fold_case;
use crate::app::services::profile_lookup::ProfileLookup;
use crate::app::services::record_processor::{EnrichmentOutcome, apply_profile_geometry};
use crate::{Error, Result};
use indicatif::ProgressBar;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Files directly inside `dir` whose extension is one of `extensions`
///
/// Extensions compare case-insensitively; the result is ordered by file name,
/// case-insensitively. A missing directory yields no files.
pub fn files_with_extensions<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Vec<PathBuf> {
    if !dir.is_dir() {
        debug!("Directory not found: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    extensions
                        .iter()
                        .any(|wanted| ext.eq_ignore_ascii_case(wanted.as_ref()))
                })
        })
        .collect();

    files.sort_by_cached_key(|path| sort_key(path));
    debug!("Discovered {} files in {}", files.len(), dir.display());
    files
}

/// `*.json` files directly inside `dir`
pub fn json_files_in(dir: &Path) -> Vec<PathBuf> {
    files_with_extensions(dir, &["json"])
}

/// True when the file name of `path` equals `name`, ignoring case
pub fn has_file_name(path: &Path, name: &str) -> bool {
    path.file_name()
        .and_then(|file_name| file_name.to_str())
        .is_some_and(|file_name| file_name.eq_ignore_ascii_case(name))
}

/// True when the file stem of `path` equals `stem`, ignoring case
pub fn has_file_stem(path: &Path, stem: &str) -> bool {
    path.file_stem()
        .and_then(|file_stem| file_stem.to_str())
        .is_some_and(|file_stem| file_stem.eq_ignore_ascii_case(stem))
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| fold_case(&name.to_string_lossy()))
        .unwrap_or_default()
}

/// Create `dir` and its parents when missing
pub fn ensure_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            Error::io(format!("Failed to create directory {}", dir.display()), e)
        })?;
        debug!("Created directory {}", dir.display());
    }
    Ok(())
}

/// Delete every `*.json` file directly inside `dir`, returning how many went
///
/// Files that cannot be removed are logged and left in place.
pub fn clear_json_files(dir: &Path) -> usize {
    let mut removed = 0;
    for path in json_files_in(dir) {
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!("Could not remove {}: {}", path.display(), e),
        }
    }
    removed
}

/// Read a JSON array of records
///
/// # Errors
/// * `Error::Io` when the file cannot be read
/// * `Error::Json` when it is not valid JSON
/// * `Error::DataValidation` when the root is not an array
pub fn try_read_record_array(path: &Path) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);

    match serde_json::from_str::<Value>(text)
        .map_err(|e| Error::json(format!("Invalid JSON in {}", path.display()), e))?
    {
        Value::Array(records) => Ok(records),
        other => Err(Error::data_validation(format!(
            "{} holds a JSON {} instead of an array",
            path.display(),
            json_type_name(&other)
        ))),
    }
}

/// Read a JSON array of records, `None` when missing or unusable
pub fn read_record_array(path: &Path) -> Option<Vec<Value>> {
    if !path.exists() {
        debug!("No records at {}", path.display());
        return None;
    }

    match try_read_record_array(path) {
        Ok(records) => Some(records),
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            None
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Write `value` as indented JSON, creating the parent directory
///
/// Non-ASCII text is written as-is, without escapes.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let mut text = serde_json::to_string_pretty(value)
        .map_err(|e| Error::json(format!("Failed to serialize {}", path.display()), e))?;
    text.push('\n');

    fs::write(path, text)
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))
}

/// Write one line per item, creating the parent directory
pub fn write_lines<I, S>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let mut text = String::new();
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }

    fs::write(path, text)
        .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))
}

// =============================================================================
// Merge
// =============================================================================

/// Records merged from a directory of JSON arrays
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Concatenated records, file order then array order
    pub records: Vec<Value>,
    /// File names merged, with their record count
    pub files: Vec<(String, usize)>,
    /// File names skipped as unreadable or not an array
    pub skipped: Vec<String>,
}

/// Concatenate the arrays of every `*.json` in `dir`
///
/// Files named `exclude` (case-insensitive) are left out, as are files that
/// fail to parse or do not hold an array.
pub fn merge_directory(dir: &Path, exclude: &str) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for path in json_files_in(dir) {
        if has_file_name(&path, exclude) {
            debug!("Merge excludes {}", path.display());
            continue;
        }

        let name = display_name(&path);
        match try_read_record_array(&path) {
            Ok(records) => {
                info!("  + {}: {} records", name, records.len());
                outcome.files.push((name, records.len()));
                outcome.records.extend(records);
            }
            Err(e) => {
                warn!("Merge skip: {}: {}", name, e);
                outcome.skipped.push(name);
            }
        }
    }

    outcome
}

// =============================================================================
// Profile patching
// =============================================================================

/// Outcome of patching a directory of JSON files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    /// JSON files holding an array
    pub files_scanned: usize,
    /// Files rewritten because at least one record was patched
    pub files_rewritten: usize,
    /// Files skipped as unreadable or not an array
    pub files_skipped: usize,
    /// Enrichment counts summed over every scanned file
    pub enrichment: EnrichmentOutcome,
}

/// Apply `lookup` to every `*.json` file in `dir`
///
/// A file is rewritten only when at least one of its records was patched.
///
/// # Errors
/// Returns `Error::Io` or `Error::Json` when a patched file cannot be written
/// back.
pub fn patch_directory(
    dir: &Path,
    lookup: &ProfileLookup,
    progress_bar: Option<&ProgressBar>,
) -> Result<PatchOutcome> {
    let mut outcome = PatchOutcome::default();

    for path in json_files_in(dir) {
        if let Some(pb) = progress_bar {
            pb.set_message(display_name(&path));
        }

        let Some(mut records) = read_record_array(&path) else {
            outcome.files_skipped += 1;
            continue;
        };
        outcome.files_scanned += 1;

        let enrichment = apply_profile_geometry(&mut records, lookup, None);
        let patched = enrichment.patched;
        outcome.enrichment.merge(enrichment);

        if patched > 0 {
            write_json_pretty(&path, &records)?;
            outcome.files_rewritten += 1;
            debug!("Patched {} records in {}", patched, path.display());
        }

        if let Some(pb) = progress_bar {
            pb.inc(1);
        }
    }

    Ok(outcome)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Geometry;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_files_sorted_case_insensitively() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "b.json", "[]");
        write(temp_dir.path(), "A.JSON", "[]");
        write(temp_dir.path(), "c.txt", "");
        fs::create_dir(temp_dir.path().join("nested.json")).unwrap();

        let names: Vec<String> = json_files_in(temp_dir.path())
            .iter()
            .map(|path| display_name(path))
            .collect();
        assert_eq!(names, vec!["A.JSON", "b.json"]);
    }

    #[test]
    fn test_missing_directory_has_no_files() {
        assert!(json_files_in(Path::new("/definitely/not/here")).is_empty());
    }

    #[test]
    fn test_read_record_array_rejects_non_arrays() {
        let temp_dir = TempDir::new().unwrap();
        let object = write(temp_dir.path(), "object.json", r#"{"a": 1}"#);
        let broken = write(temp_dir.path(), "broken.json", "[{");
        let bom = write(temp_dir.path(), "bom.json", "\u{FEFF}[{\"Name\": \"x\"}]");

        assert!(read_record_array(&object).is_none());
        assert!(read_record_array(&broken).is_none());
        assert!(read_record_array(&temp_dir.path().join("missing.json")).is_none());
        assert_eq!(read_record_array(&bom).unwrap().len(), 1);
        assert!(matches!(
            try_read_record_array(&object),
            Err(Error::DataValidation { .. })
        ));
    }

    #[test]
    fn test_write_json_keeps_non_ascii_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("records.json");

        write_json_pretty(&path, &json!([{ "Profile": "20Б1" }])).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("20Б1"));
        assert!(text.contains("\n  {"));
    }

    #[test]
    fn test_write_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("list.txt");

        write_lines(&path, ["a", "b"]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");

        write_lines(&path, Vec::<String>::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_merge_excludes_reference_and_skips_bad_files() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "b.json", r#"[{"CONNECTION_CODE": "B-1"}]"#);
        write(
            temp_dir.path(),
            "a.json",
            r#"[{"CONNECTION_CODE": "A-1"}, {"CONNECTION_CODE": "A-2"}]"#,
        );
        write(temp_dir.path(), "profile.JSON", r#"[{"Profile": "10Б1"}]"#);
        write(temp_dir.path(), "c.json", "not json");

        let outcome = merge_directory(temp_dir.path(), "Profile.json");

        let codes: Vec<&str> = outcome
            .records
            .iter()
            .filter_map(|record| record["CONNECTION_CODE"].as_str())
            .collect();
        assert_eq!(codes, vec!["A-1", "A-2", "B-1"]);
        assert_eq!(
            outcome.files,
            vec![("a.json".to_string(), 2), ("b.json".to_string(), 1)]
        );
        assert_eq!(outcome.skipped, vec!["c.json"]);
    }

    #[test]
    fn test_patch_directory_rewrites_only_patched_files() {
        let temp_dir = TempDir::new().unwrap();
        let hit = write(
            temp_dir.path(),
            "hit.json",
            r#"[{"Profile": "10Б1", "H": 0, "B": 0, "s": 0, "t": 0}]"#,
        );
        let miss_text = r#"[{"Profile":"99Z","H":0}]"#;
        let miss = write(temp_dir.path(), "miss.json", miss_text);
        write(temp_dir.path(), "object.json", r#"{"Profile": "10Б1"}"#);

        let lookup: ProfileLookup = [("10Б1", Geometry::new(100.0, 55.0, 4.1, 5.7))]
            .into_iter()
            .collect();
        let outcome = patch_directory(temp_dir.path(), &lookup, None).unwrap();

        assert_eq!(outcome.files_scanned, 2);
        assert_eq!(outcome.files_rewritten, 1);
        assert_eq!(outcome.files_skipped, 1);
        assert_eq!(outcome.enrichment.patched, 1);
        assert_eq!(outcome.enrichment.unresolved, 1);

        let patched = read_record_array(&hit).unwrap();
        assert_eq!(patched[0]["H"], 100.0);
        assert_eq!(fs::read_to_string(&miss).unwrap(), miss_text);
    }

    #[test]
    fn test_clear_json_files() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "a.json", "[]");
        write(temp_dir.path(), "keep.txt", "");

        assert_eq!(clear_json_files(temp_dir.path()), 1);
        assert!(temp_dir.path().join("keep.txt").exists());
    }
}
