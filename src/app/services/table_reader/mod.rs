//! Delimited-text table reader for connection and profile-reference tables
//!
//! Spreadsheet exports arrive as tab-separated (`.tsv`, `.txt`) or
//! comma-separated (`.csv`) text. The header row is located within the first
//! rows of the file, resolved by the header resolver, and every data row is
//! mapped onto a typed record.
//!
//! - [`reader`] - header detection and row mapping
//! - [`field_parsers`] - culture-tolerant numeric cell parsing

pub mod field_parsers;
pub mod reader;

#[cfg(test)]
pub mod tests;

pub use reader::{TableData, TableReader};
