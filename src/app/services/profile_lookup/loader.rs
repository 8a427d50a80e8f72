//! Profile lookup loading
//!
//! The lookup is built from the reference JSON (`Profile.json`), from already
//! converted records, or directly from a delimited reference table. A missing
//! or unreadable reference JSON yields an empty lookup: geometry enrichment is
//! an optional stage and must not abort the stages after it.

use super::ProfileLookup;
use crate::app::models::{ConnectionRecord, Geometry, TableKind};
use crate::app::services::table_reader::TableReader;
use crate::constants::record_keys;
use crate::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

impl ProfileLookup {
    /// Build a lookup from converted records, later duplicates overwrite
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ConnectionRecord>,
    {
        records
            .into_iter()
            .map(|record| (record.profile.as_str(), record.geometry()))
            .collect()
    }

    /// Load the reference JSON, degrading to an empty lookup on any failure
    pub fn load_json(path: &Path) -> Self {
        if !path.exists() {
            warn!("Profile reference not found: {}", path.display());
            return Self::new();
        }

        match Self::try_load_json(path) {
            Ok(lookup) => {
                info!(
                    "Loaded profiles: {} from {}",
                    lookup.len(),
                    path.display()
                );
                lookup
            }
            Err(e) => {
                warn!("Failed to read profile reference {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Load the reference JSON, reporting why it could not be read
    ///
    /// # Errors
    /// * `Error::Io` when the file cannot be read
    /// * `Error::Json` when it is not valid JSON
    /// * `Error::DataValidation` when the root is not an array or a geometry
    ///   value is not a number
    pub fn try_load_json(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;
        let root: Value = serde_json::from_str(&text)
            .map_err(|e| Error::json(format!("Invalid JSON in {}", path.display()), e))?;

        let mut lookup = Self::from_json_value(&root)?;
        lookup.source = Some(path.to_path_buf());
        Ok(lookup)
    }

    /// Build a lookup from a JSON array of reference objects
    ///
    /// Non-object items and objects without a usable Profile are skipped;
    /// absent geometry fields read as zero.
    pub fn from_json_value(root: &Value) -> Result<Self> {
        let items = root.as_array().ok_or_else(|| {
            Error::data_validation("profile reference root is not a JSON array")
        })?;

        let mut lookup = Self::new();
        for item in items {
            let Some(object) = item.as_object() else {
                continue;
            };
            let Some(profile) = object.get(record_keys::PROFILE).and_then(Value::as_str) else {
                continue;
            };

            let geometry = Geometry::new(
                number_field(item, record_keys::H)?,
                number_field(item, record_keys::B)?,
                number_field(item, record_keys::S)?,
                number_field(item, record_keys::T_GEOMETRY)?,
            );
            lookup.insert(profile, geometry);
        }
        Ok(lookup)
    }

    /// Read a delimited reference table and build the lookup from its rows
    pub fn from_reference_table(path: &Path, reader: &TableReader) -> Result<Self> {
        let table = reader.read_path(path)?;
        if table.kind() == Some(TableKind::Main) {
            warn!(
                "{} resolved as a main table, using its Profile and geometry columns",
                path.display()
            );
        }

        let mut lookup = Self::from_records(&table.records);
        lookup.source = Some(path.to_path_buf());
        debug!(
            "Built {} profiles from {} rows of {}",
            lookup.len(),
            table.records.len(),
            path.display()
        );
        Ok(lookup)
    }
}

fn number_field(item: &Value, key: &str) -> Result<f64> {
    match item.get(key) {
        None | Some(Value::Null) => Ok(0.0),
        Some(value) => value.as_f64().ok_or_else(|| {
            Error::data_validation(format!("'{key}' is not a number: {value}"))
        }),
    }
}
