//! Tests for building and loading the profile lookup

use super::*;
use crate::app::models::ConnectionRecord;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_insert_normalizes_and_skips_blank_keys() {
    let mut lookup = ProfileLookup::new();

    assert!(lookup.insert(" 10 Б1 ", geometry(1.0)));
    assert!(!lookup.insert("  ", geometry(2.0)));
    assert_eq!(lookup.len(), 1);
    assert_eq!(lookup.keys().collect::<Vec<_>>(), vec!["10Б1"]);
}

#[test]
fn test_duplicate_key_overwrites_value_keeps_position() {
    let mut lookup = ProfileLookup::new();
    lookup.insert("101A", geometry(1.0));
    lookup.insert("102", geometry(2.0));
    assert!(!lookup.insert("101a", geometry(3.0)));

    assert_eq!(lookup.len(), 2);
    assert_eq!(lookup.keys().collect::<Vec<_>>(), vec!["101A", "102"]);
    assert_eq!(lookup.get("101A"), Some(geometry(3.0)));
    // Prefix tier still finds the first inserted key
    assert_eq!(lookup.resolve("1-0-1").unwrap().key, "101A");
}

#[test]
fn test_from_records() {
    let records = vec![
        ConnectionRecord {
            profile: "20Б1".to_string(),
            h: 200.0,
            ..Default::default()
        },
        ConnectionRecord {
            profile: "".to_string(),
            h: 1.0,
            ..Default::default()
        },
    ];

    let lookup = ProfileLookup::from_records(&records);
    assert_eq!(lookup.len(), 1);
    assert_eq!(lookup.get("20б1").unwrap().height, 200.0);
}

#[test]
fn test_from_json_value_skips_unusable_items() {
    let root = json!([
        { "Profile": "10Б1", "H": 100, "B": 55, "s": 4.1, "t": 5.7 },
        { "Profile": "  " , "H": 1 },
        { "Name": "no profile" },
        42,
        { "Profile": "12Б1", "H": 120 }
    ]);

    let lookup = ProfileLookup::from_json_value(&root).unwrap();
    assert_eq!(lookup.len(), 2);
    assert_eq!(lookup.get("10Б1").unwrap().flange_thickness, 5.7);
    assert_eq!(lookup.get("12Б1").unwrap().width, 0.0);
}

#[test]
fn test_from_json_value_rejects_non_numeric_geometry() {
    let root = json!([{ "Profile": "10Б1", "H": "tall" }]);
    assert!(ProfileLookup::from_json_value(&root).is_err());
}

#[test]
fn test_load_json_missing_file_is_empty() {
    let lookup = ProfileLookup::load_json(std::path::Path::new("/no/such/Profile.json"));
    assert!(lookup.is_empty());
}

#[test]
fn test_load_json_malformed_file_is_empty() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    assert!(ProfileLookup::load_json(file.path()).is_empty());
}

#[test]
fn test_load_json_object_root_is_empty() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "Profile": "10Б1" }}"#).unwrap();

    assert!(ProfileLookup::load_json(file.path()).is_empty());
}

#[test]
fn test_load_json_records_source() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"[{{ "Profile": "10Б1", "H": 100 }}]"#).unwrap();

    let lookup = ProfileLookup::load_json(file.path());
    assert_eq!(lookup.len(), 1);
    assert_eq!(lookup.source().unwrap(), file.path());
}
