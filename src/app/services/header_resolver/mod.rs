//! Header resolution for connection and profile-reference tables
//!
//! Maps an unreliable row of column labels onto the canonical schema. Labels
//! may be missing, differ in case, use Cyrillic look-alikes, or have lost their
//! Greek letters to a placeholder during an earlier lossy re-encode.
//!
//! ## Resolution order
//!
//! 1. Every canonical field takes the first header token (left to right) that
//!    matches one of its accepted spellings.
//! 2. The map is classified as a main table (Name, code, Profile) or a
//!    profile-reference table (Profile, H, B, s, t).
//! 3. When neither shape holds, positional fallback assumes H, B, s, t follow
//!    Profile, or that columns 0..4 are Profile, H, B, s, t when Profile is
//!    missing too. A table still unclassified is an unrecognized schema.
//! 4. When `Mo` is present but coefficient columns are missing, they are taken
//!    from the six columns after `Mo`, or else from the first six placeholder
//!    tokens.
//!
//! Resolution is a pure function of the header tokens and the synonym table.

pub mod column_map;
pub mod synonyms;

#[cfg(test)]
pub mod tests;

pub use column_map::{ColumnMap, Field};
pub use synonyms::SynonymTable;

use crate::app::models::TableKind;
use crate::constants::{
    COEFFICIENT_COLUMN_COUNT, DEFAULT_COEFFICIENT_PLACEHOLDER, PROFILE_TABLE_WIDTH,
};
use crate::{Error, Result};
use tracing::debug;

/// Positional rule that produced the table shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFallback {
    /// Named matching alone classified the table
    None,
    /// H, B, s, t assumed to follow the Profile column
    ProfileRelative,
    /// Columns 0..4 assumed to be Profile, H, B, s, t
    Absolute,
}

/// Rule that filled missing coefficient columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoefficientFallback {
    None,
    /// The six columns after `Mo`
    FollowingMo,
    /// The first six placeholder tokens
    Placeholders,
}

/// Outcome of resolving one header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeader {
    pub columns: ColumnMap,
    pub kind: TableKind,
    pub fallback: HeaderFallback,
    pub coefficients: CoefficientFallback,
}

/// Resolves raw header rows against a synonym table
#[derive(Debug, Clone)]
pub struct HeaderResolver {
    synonyms: SynonymTable,
    placeholder: String,
}

impl Default for HeaderResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderResolver {
    /// Resolver with the built-in spellings and `?` placeholder
    pub fn new() -> Self {
        Self {
            synonyms: SynonymTable::default(),
            placeholder: DEFAULT_COEFFICIENT_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Header token that corrupted coefficient labels degrade into
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Named matching only: first matching column per field
    pub fn match_columns<S: AsRef<str>>(&self, header: &[S]) -> ColumnMap {
        let mut columns = ColumnMap::new();
        for field in Field::ALL {
            if let Some(index) = header
                .iter()
                .position(|token| self.synonyms.matches(field, token.as_ref()))
            {
                columns.set(field, index);
            }
        }
        columns
    }

    /// True when named matching alone satisfies either table shape
    pub fn recognizes<S: AsRef<str>>(&self, header: &[S]) -> bool {
        self.match_columns(header).classify().is_some()
    }

    /// Resolve a header row
    pub fn resolve<S: AsRef<str>>(&self, header: &[S]) -> Result<ResolvedHeader> {
        self.resolve_table("header row", header)
    }

    /// Resolve the header row of `table`, naming it in any schema error
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnrecognizedSchema`] when no fallback yields a main or
    /// profile-reference shape.
    pub fn resolve_table<S: AsRef<str>>(&self, table: &str, header: &[S]) -> Result<ResolvedHeader> {
        let mut columns = self.match_columns(header);

        let (kind, fallback) = match columns.classify() {
            Some(kind) => (kind, HeaderFallback::None),
            None => {
                let fallback = apply_shape_fallback(&mut columns, header.len())
                    .map_err(|reason| schema_error(table, reason, header))?;
                debug!("{}: header classified via {:?} fallback", table, fallback);
                (TableKind::ProfileReference, fallback)
            }
        };

        let coefficients = self.apply_coefficient_fallback(&mut columns, header);
        if coefficients != CoefficientFallback::None {
            debug!("{}: coefficient columns filled via {:?}", table, coefficients);
        }

        Ok(ResolvedHeader {
            columns,
            kind,
            fallback,
            coefficients,
        })
    }

    fn apply_coefficient_fallback<S: AsRef<str>>(
        &self,
        columns: &mut ColumnMap,
        header: &[S],
    ) -> CoefficientFallback {
        let Some(mo) = columns.get(Field::Mo) else {
            return CoefficientFallback::None;
        };
        if columns.coefficient_count() == COEFFICIENT_COLUMN_COUNT {
            return CoefficientFallback::None;
        }

        let first = mo + 1;
        if header.len().saturating_sub(first) >= COEFFICIENT_COLUMN_COUNT {
            for (offset, field) in Field::COEFFICIENTS.iter().enumerate() {
                columns.set_if_absent(*field, first + offset);
            }
            return CoefficientFallback::FollowingMo;
        }

        let placeholders: Vec<usize> = header
            .iter()
            .enumerate()
            .filter(|(_, token)| token.as_ref().trim() == self.placeholder)
            .map(|(index, _)| index)
            .take(COEFFICIENT_COLUMN_COUNT)
            .collect();
        if placeholders.len() == COEFFICIENT_COLUMN_COUNT {
            for (field, index) in Field::COEFFICIENTS.iter().zip(placeholders) {
                columns.set_if_absent(*field, index);
            }
            return CoefficientFallback::Placeholders;
        }

        CoefficientFallback::None
    }
}

/// Positional fallback for tables that named matching could not classify
///
/// Profile present: missing geometry columns are the four after it, all of
/// which must exist. Profile absent: columns 0..4 are Profile, H, B, s, t.
fn apply_shape_fallback(
    columns: &mut ColumnMap,
    width: usize,
) -> std::result::Result<HeaderFallback, String> {
    match columns.get(Field::Profile) {
        Some(profile) => {
            for (offset, field) in Field::GEOMETRY.iter().enumerate() {
                columns.set_if_absent(*field, profile + 1 + offset);
            }
            let in_bounds = Field::GEOMETRY
                .iter()
                .filter_map(|field| columns.get(*field))
                .all(|index| index < width);
            if in_bounds && columns.is_profile_table() {
                Ok(HeaderFallback::ProfileRelative)
            } else {
                Err(format!(
                    "Profile found at column {profile} but the four geometry columns after it do not fit in {width} columns"
                ))
            }
        }
        None if width >= PROFILE_TABLE_WIDTH => {
            columns.set(Field::Profile, 0);
            for (offset, field) in Field::GEOMETRY.iter().enumerate() {
                columns.set(*field, offset + 1);
            }
            Ok(HeaderFallback::Absolute)
        }
        None => Err(format!(
            "no Profile column and only {width} columns, at least {PROFILE_TABLE_WIDTH} required"
        )),
    }
}

fn schema_error<S: AsRef<str>>(table: &str, reason: String, header: &[S]) -> Error {
    let tokens: Vec<String> = header.iter().map(|t| t.as_ref().to_string()).collect();
    Error::unrecognized_schema(table, reason, &tokens)
}
