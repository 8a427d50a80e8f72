//! Data models for connection table processing
//!
//! This module contains the record shapes handed between the pipeline stages:
//! typed connection records produced from source tables, profile geometry, the
//! rename log, and the two traits that let the resolution and deduplication
//! passes work on both typed records and raw JSON objects.

use crate::constants::record_keys;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Geometry
// =============================================================================

/// Dimensional parameters of a structural profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    /// Section height
    #[serde(rename = "H")]
    pub height: f64,

    /// Flange width
    #[serde(rename = "B")]
    pub width: f64,

    /// Web thickness
    #[serde(rename = "s")]
    pub web_thickness: f64,

    /// Flange thickness
    #[serde(rename = "t")]
    pub flange_thickness: f64,
}

impl Geometry {
    pub fn new(height: f64, width: f64, web_thickness: f64, flange_thickness: f64) -> Self {
        Self {
            height,
            width,
            web_thickness,
            flange_thickness,
        }
    }

    /// Geometry as `(key, value)` pairs in serialization order
    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [
            (record_keys::H, self.height),
            (record_keys::B, self.width),
            (record_keys::S, self.web_thickness),
            (record_keys::T_GEOMETRY, self.flange_thickness),
        ]
    }
}

// =============================================================================
// Connection Record
// =============================================================================

/// One structural connection row
///
/// Field order matches the JSON layout written by the converter. Geometry is
/// always serialized, zero when the profile could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionRecord {
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "CONNECTION_CODE", alias = "ConnectionCode")]
    pub connection_code: String,

    #[serde(rename = "Profile")]
    pub profile: String,

    #[serde(rename = "H")]
    pub h: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "s")]
    pub s: f64,
    #[serde(rename = "t")]
    pub t: f64,

    #[serde(rename = "Nt")]
    pub nt: i32,
    #[serde(rename = "Nc")]
    pub nc: i32,
    #[serde(rename = "N")]
    pub n: i32,
    #[serde(rename = "Qo")]
    pub qo: i32,
    #[serde(rename = "Q")]
    pub q: i32,
    #[serde(rename = "T")]
    pub t_force: i32,
    #[serde(rename = "M")]
    pub m: i32,
    pub variable: i32,
    #[serde(rename = "Sj")]
    pub sj: i32,
    #[serde(rename = "Sjo")]
    pub sjo: i32,

    #[serde(rename = "Mneg")]
    pub mneg: f64,
    #[serde(rename = "Mo")]
    pub mo: f64,

    #[serde(rename = "α", alias = "Alpha")]
    pub alpha: f64,
    #[serde(rename = "β", alias = "Beta")]
    pub beta: f64,
    #[serde(rename = "γ", alias = "Gamma")]
    pub gamma: f64,
    #[serde(rename = "δ", alias = "Delta")]
    pub delta: f64,
    #[serde(rename = "ε", alias = "Epsilon")]
    pub epsilon: f64,
    #[serde(rename = "λ", alias = "Lambda")]
    pub lambda: f64,
}

impl ConnectionRecord {
    /// Current geometry of the record
    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.h, self.b, self.s, self.t)
    }
}

// =============================================================================
// Table and audit types
// =============================================================================

/// Schema shape of a source table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    /// Connection rows keyed by Name, code and Profile
    Main,
    /// Profile designation with its geometry tuple
    ProfileReference,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Main => write!(f, "main"),
            TableKind::ProfileReference => write!(f, "profile-reference"),
        }
    }
}

/// One code rewrite performed by the deduplicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameEntry {
    pub original: String,
    pub renamed: String,
}

impl RenameEntry {
    pub fn new(original: impl Into<String>, renamed: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            renamed: renamed.into(),
        }
    }
}

/// Rename report line format
impl fmt::Display for RenameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.original, self.renamed)
    }
}

// =============================================================================
// Record access traits
// =============================================================================

/// A record carrying a connection code
pub trait CodedRecord {
    /// Raw code, `None` when the record has none
    fn connection_code(&self) -> Option<&str>;

    /// Replace the code in place
    fn set_connection_code(&mut self, code: String);
}

/// A record carrying a profile designation and geometry
pub trait ProfiledRecord {
    /// Raw profile designation, `None` when the record has none
    fn profile(&self) -> Option<&str>;

    /// Overwrite H, B, s and t
    fn set_geometry(&mut self, geometry: Geometry);
}

impl CodedRecord for ConnectionRecord {
    fn connection_code(&self) -> Option<&str> {
        Some(self.connection_code.as_str())
    }

    fn set_connection_code(&mut self, code: String) {
        self.connection_code = code;
    }
}

impl ProfiledRecord for ConnectionRecord {
    fn profile(&self) -> Option<&str> {
        Some(self.profile.as_str())
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        self.h = geometry.height;
        self.b = geometry.width;
        self.s = geometry.web_thickness;
        self.t = geometry.flange_thickness;
    }
}

/// Raw JSON objects, as read back from per-table and merged files.
///
/// Non-object values carry neither a code nor a profile and are never written.
impl CodedRecord for Value {
    fn connection_code(&self) -> Option<&str> {
        let object = self.as_object()?;
        record_keys::CODE_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
    }

    fn set_connection_code(&mut self, code: String) {
        if let Some(object) = self.as_object_mut() {
            let key = code_key(object);
            object.insert(key.to_string(), Value::String(code));
        }
    }
}

impl ProfiledRecord for Value {
    fn profile(&self) -> Option<&str> {
        self.as_object()?
            .get(record_keys::PROFILE)
            .and_then(Value::as_str)
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        if let Some(object) = self.as_object_mut() {
            for (key, value) in geometry.fields() {
                object.insert(key.to_string(), Value::from(value));
            }
        }
    }
}

/// Key the object already stores its code under, canonical key otherwise
fn code_key(object: &Map<String, Value>) -> &'static str {
    record_keys::CODE_KEYS
        .iter()
        .copied()
        .find(|key| object.contains_key(*key))
        .unwrap_or(record_keys::CONNECTION_CODE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_in_table_order() {
        let record = ConnectionRecord {
            name: "Beam splice".to_string(),
            connection_code: "H2-1".to_string(),
            profile: "20Б1".to_string(),
            ..Default::default()
        };

        let text = serde_json::to_string(&record).unwrap();
        let name = text.find("\"Name\"").unwrap();
        let code = text.find("\"CONNECTION_CODE\"").unwrap();
        let profile = text.find("\"Profile\"").unwrap();
        let height = text.find("\"H\"").unwrap();
        let lambda = text.find("\"λ\"").unwrap();
        assert!(name < code && code < profile && profile < height && height < lambda);
    }

    #[test]
    fn test_record_accepts_code_and_coefficient_aliases() {
        let record: ConnectionRecord = serde_json::from_value(json!({
            "ConnectionCode": "K-7",
            "Alpha": 1.5,
            "Profile": "10Б1"
        }))
        .unwrap();

        assert_eq!(record.connection_code, "K-7");
        assert_eq!(record.alpha, 1.5);
        assert_eq!(record.h, 0.0);
    }

    #[test]
    fn test_value_code_written_under_existing_key() {
        let mut value = json!({ "ConnectionCode": "H2-1", "Name": "x" });
        value.set_connection_code("H2-4".to_string());

        assert_eq!(value["ConnectionCode"], "H2-4");
        assert!(value.get("CONNECTION_CODE").is_none());
        assert_eq!(value.connection_code(), Some("H2-4"));
    }

    #[test]
    fn test_value_prefers_canonical_code_key() {
        let value = json!({ "CONNECTION_CODE": "A-1", "ConnectionCode": "B-2" });
        assert_eq!(value.connection_code(), Some("A-1"));
    }

    #[test]
    fn test_value_geometry_overwrites_fields() {
        let mut value = json!({ "Profile": "20Б1", "H": 0, "B": 0, "s": 0, "t": 0 });
        value.set_geometry(Geometry::new(200.0, 100.0, 5.6, 8.5));

        assert_eq!(value["H"], 200.0);
        assert_eq!(value["t"], 8.5);
        assert_eq!(value.profile(), Some("20Б1"));
    }

    #[test]
    fn test_non_object_value_has_no_code() {
        let mut value = json!([1, 2, 3]);
        assert_eq!(value.connection_code(), None);
        value.set_connection_code("A-1".to_string());
        assert_eq!(value, json!([1, 2, 3]));
    }

    #[test]
    fn test_rename_entry_display() {
        assert_eq!(RenameEntry::new("H2-1", "H2-4").to_string(), "H2-1 => H2-4");
    }
}
