//! Accepted raw spellings per canonical field

use super::column_map::Field;
use crate::app::services::normalization::eq_ignore_case;
use crate::constants::header_spellings;
use std::collections::BTreeMap;

/// Static table of {canonical field -> accepted spellings}
///
/// Spellings are compared case-insensitively against trimmed header tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymTable {
    spellings: BTreeMap<Field, Vec<String>>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        let mut table = Self::empty();
        for field in Field::ALL {
            for spelling in default_spellings(field) {
                table.add(field, *spelling);
            }
        }
        table
    }
}

impl SynonymTable {
    /// Table without any spelling; every field resolves as absent
    pub fn empty() -> Self {
        Self {
            spellings: BTreeMap::new(),
        }
    }

    /// Accept one more spelling for `field`
    pub fn add(&mut self, field: Field, spelling: impl Into<String>) {
        let spelling = spelling.into();
        let entry = self.spellings.entry(field).or_default();
        if !entry.iter().any(|known| *known == spelling) {
            entry.push(spelling);
        }
    }

    /// Builder form of [`SynonymTable::add`]
    pub fn with_spelling(mut self, field: Field, spelling: impl Into<String>) -> Self {
        self.add(field, spelling);
        self
    }

    /// Spellings accepted for `field`
    pub fn spellings(&self, field: Field) -> &[String] {
        self.spellings
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// True when `token` is an accepted spelling of `field`
    pub fn matches(&self, field: Field, token: &str) -> bool {
        let token = token.trim();
        !token.is_empty()
            && self
                .spellings(field)
                .iter()
                .any(|spelling| eq_ignore_case(spelling, token))
    }
}

fn default_spellings(field: Field) -> &'static [&'static str] {
    match field {
        Field::Name => header_spellings::NAME,
        Field::ConnectionCode => header_spellings::CONNECTION_CODE,
        Field::Profile => header_spellings::PROFILE,
        Field::Height => header_spellings::H,
        Field::Width => header_spellings::B,
        Field::WebThickness => header_spellings::S,
        Field::FlangeThickness => header_spellings::T_GEOMETRY,
        Field::Nt => header_spellings::NT,
        Field::Nc => header_spellings::NC,
        Field::N => header_spellings::N,
        Field::Qo => header_spellings::QO,
        Field::Q => header_spellings::Q,
        Field::T => header_spellings::T,
        Field::M => header_spellings::M,
        Field::Variable => header_spellings::VARIABLE,
        Field::Sj => header_spellings::SJ,
        Field::Sjo => header_spellings::SJO,
        Field::Mneg => header_spellings::MNEG,
        Field::Mo => header_spellings::MO,
        Field::Alpha => header_spellings::ALPHA,
        Field::Beta => header_spellings::BETA,
        Field::Gamma => header_spellings::GAMMA,
        Field::Delta => header_spellings::DELTA,
        Field::Epsilon => header_spellings::EPSILON,
        Field::Lambda => header_spellings::LAMBDA,
    }
}
