//! Delimited-text table reading
//!
//! Reads tab- or comma-separated exports, locates the header row, resolves it
//! and maps data rows onto [`ConnectionRecord`]s.

use super::field_parsers::{cell, parse_float, parse_int};
use crate::app::models::{ConnectionRecord, TableKind};
use crate::app::services::header_resolver::{ColumnMap, Field, HeaderResolver, ResolvedHeader};
use crate::config::Config;
use crate::constants::DEFAULT_HEADER_SCAN_ROWS;
use crate::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Byte order mark some exporters prepend
const BOM: char = '\u{FEFF}';

/// A table read into records
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    /// File or table name used in logs and errors
    pub name: String,

    /// Resolved header, `None` when the table had no rows at all
    pub header: Option<ResolvedHeader>,

    /// Index of the header row among the non-blank rows
    pub header_row: usize,

    pub records: Vec<ConnectionRecord>,

    /// Data rows dropped for lacking a code (main) or profile (reference)
    pub skipped_rows: usize,
}

impl TableData {
    fn empty(name: &str) -> Self {
        Self {
            name: name.to_string(),
            header: None,
            header_row: 0,
            records: Vec::new(),
            skipped_rows: 0,
        }
    }

    /// Schema shape of the table
    pub fn kind(&self) -> Option<TableKind> {
        self.header.as_ref().map(|header| header.kind)
    }
}

/// Reader for delimited connection and profile-reference tables
#[derive(Debug, Clone)]
pub struct TableReader {
    resolver: HeaderResolver,
    scan_rows: usize,
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new(HeaderResolver::new(), DEFAULT_HEADER_SCAN_ROWS)
    }
}

impl TableReader {
    /// Create a reader scanning up to `scan_rows` rows for the header
    pub fn new(resolver: HeaderResolver, scan_rows: usize) -> Self {
        Self {
            resolver,
            scan_rows: scan_rows.max(1),
        }
    }

    /// Reader configured from the processing section
    pub fn from_config(config: &Config) -> Self {
        let resolver =
            HeaderResolver::new().with_placeholder(config.processing.coefficient_placeholder.clone());
        Self::new(resolver, config.processing.header_scan_rows)
    }

    pub fn resolver(&self) -> &HeaderResolver {
        &self.resolver
    }

    /// Field delimiter for a file: comma for `.csv`, tab otherwise
    pub fn delimiter_for(path: &Path) -> u8 {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => b',',
            _ => b'\t',
        }
    }

    /// Read and map a table file
    ///
    /// # Errors
    /// * `Error::Io` when the file cannot be read
    /// * `Error::TableParsing` for malformed delimited text
    /// * `Error::UnrecognizedSchema` when the header cannot be interpreted
    pub fn read_path(&self, path: &Path) -> Result<TableData> {
        let bytes = fs::read(path)
            .map_err(|e| Error::io(format!("Failed to read table {}", path.display()), e))?;
        let text = String::from_utf8_lossy(&bytes);
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let table = self.read_text(&name, &text, Self::delimiter_for(path))?;
        info!(
            "Read {} records from {} ({} rows skipped)",
            table.records.len(),
            name,
            table.skipped_rows
        );
        Ok(table)
    }

    /// Read and map delimited text
    pub fn read_text(&self, name: &str, text: &str, delimiter: u8) -> Result<TableData> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                Error::table_parsing(name, format!("Malformed row {}", line + 1), Some(e))
            })?;
            let row: Vec<String> = record.iter().map(str::to_string).collect();
            if row.iter().any(|value| !value.trim().is_empty()) {
                rows.push(row);
            }
        }

        self.read_rows(name, &rows)
    }

    /// Map pre-split rows: header detection, resolution and row mapping
    pub fn read_rows(&self, name: &str, rows: &[Vec<String>]) -> Result<TableData> {
        if rows.is_empty() {
            debug!("{}: no rows", name);
            return Ok(TableData::empty(name));
        }

        let header_row = self.find_header_row(rows);
        let header = self.resolver.resolve_table(name, &rows[header_row])?;
        debug!(
            "{}: header at row {} resolved as {} ({:?} fallback)",
            name, header_row, header.kind, header.fallback
        );

        let mut records = Vec::with_capacity(rows.len() - header_row - 1);
        let mut skipped_rows = 0;
        for row in &rows[header_row + 1..] {
            let mapped = match header.kind {
                TableKind::Main => map_main_row(row, &header.columns),
                TableKind::ProfileReference => map_profile_row(row, &header.columns),
            };
            match mapped {
                Some(record) => records.push(record),
                None => skipped_rows += 1,
            }
        }

        Ok(TableData {
            name: name.to_string(),
            header: Some(header),
            header_row,
            records,
            skipped_rows,
        })
    }

    /// First row within the scan window that names either table shape
    ///
    /// Falls back to the first row, leaving interpretation to the positional
    /// rules of the resolver.
    pub fn find_header_row(&self, rows: &[Vec<String>]) -> usize {
        rows.iter()
            .take(self.scan_rows)
            .position(|row| self.resolver.recognizes(row))
            .unwrap_or(0)
    }
}

/// Main-table row, `None` when the code is blank
fn map_main_row(row: &[String], columns: &ColumnMap) -> Option<ConnectionRecord> {
    let code = cell(row, columns.get(Field::ConnectionCode));
    if code.is_empty() {
        return None;
    }

    let text = |field: Field| cell(row, columns.get(field));
    let float = |field: Field| parse_float(text(field));
    let int = |field: Field| parse_int(text(field));

    Some(ConnectionRecord {
        name: text(Field::Name).to_string(),
        connection_code: code.to_string(),
        profile: text(Field::Profile).to_string(),
        h: float(Field::Height),
        b: float(Field::Width),
        s: float(Field::WebThickness),
        t: float(Field::FlangeThickness),
        nt: int(Field::Nt),
        nc: int(Field::Nc),
        n: int(Field::N),
        qo: int(Field::Qo),
        q: int(Field::Q),
        t_force: int(Field::T),
        m: int(Field::M),
        variable: int(Field::Variable),
        sj: int(Field::Sj),
        sjo: int(Field::Sjo),
        mneg: float(Field::Mneg),
        mo: float(Field::Mo),
        alpha: float(Field::Alpha),
        beta: float(Field::Beta),
        gamma: float(Field::Gamma),
        delta: float(Field::Delta),
        epsilon: float(Field::Epsilon),
        lambda: float(Field::Lambda),
    })
}

/// Profile-reference row, `None` when the profile is blank
fn map_profile_row(row: &[String], columns: &ColumnMap) -> Option<ConnectionRecord> {
    let profile = cell(row, columns.get(Field::Profile));
    if profile.is_empty() {
        return None;
    }

    let float = |field: Field| parse_float(cell(row, columns.get(field)));
    Some(ConnectionRecord {
        profile: profile.to_string(),
        h: float(Field::Height),
        b: float(Field::Width),
        s: float(Field::WebThickness),
        t: float(Field::FlangeThickness),
        ..Default::default()
    })
}
