//! Canonical fields and the per-table column index map

use crate::app::models::TableKind;
use crate::constants::record_keys;

/// Canonical column of a connection or profile-reference table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Name,
    ConnectionCode,
    Profile,
    Height,
    Width,
    WebThickness,
    FlangeThickness,
    Nt,
    Nc,
    N,
    Qo,
    Q,
    T,
    M,
    Variable,
    Sj,
    Sjo,
    Mneg,
    Mo,
    Alpha,
    Beta,
    Gamma,
    Delta,
    Epsilon,
    Lambda,
}

impl Field {
    pub const COUNT: usize = 25;

    /// Every field, in record order
    pub const ALL: [Field; Field::COUNT] = [
        Field::Name,
        Field::ConnectionCode,
        Field::Profile,
        Field::Height,
        Field::Width,
        Field::WebThickness,
        Field::FlangeThickness,
        Field::Nt,
        Field::Nc,
        Field::N,
        Field::Qo,
        Field::Q,
        Field::T,
        Field::M,
        Field::Variable,
        Field::Sj,
        Field::Sjo,
        Field::Mneg,
        Field::Mo,
        Field::Alpha,
        Field::Beta,
        Field::Gamma,
        Field::Delta,
        Field::Epsilon,
        Field::Lambda,
    ];

    /// H, B, s, t
    pub const GEOMETRY: [Field; 4] = [
        Field::Height,
        Field::Width,
        Field::WebThickness,
        Field::FlangeThickness,
    ];

    /// The six coefficient columns that follow `Mo`
    pub const COEFFICIENTS: [Field; 6] = [
        Field::Alpha,
        Field::Beta,
        Field::Gamma,
        Field::Delta,
        Field::Epsilon,
        Field::Lambda,
    ];

    /// JSON key the field is written under
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => record_keys::NAME,
            Field::ConnectionCode => record_keys::CONNECTION_CODE,
            Field::Profile => record_keys::PROFILE,
            Field::Height => record_keys::H,
            Field::Width => record_keys::B,
            Field::WebThickness => record_keys::S,
            Field::FlangeThickness => record_keys::T_GEOMETRY,
            Field::Nt => "Nt",
            Field::Nc => "Nc",
            Field::N => "N",
            Field::Qo => "Qo",
            Field::Q => "Q",
            Field::T => "T",
            Field::M => "M",
            Field::Variable => "variable",
            Field::Sj => "Sj",
            Field::Sjo => "Sjo",
            Field::Mneg => "Mneg",
            Field::Mo => "Mo",
            Field::Alpha => "α",
            Field::Beta => "β",
            Field::Gamma => "γ",
            Field::Delta => "δ",
            Field::Epsilon => "ε",
            Field::Lambda => "λ",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Column index per canonical field, `None` when absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: [Option<usize>; Field::COUNT],
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column index of `field`
    pub fn get(&self, field: Field) -> Option<usize> {
        self.columns[field.slot()]
    }

    pub fn set(&mut self, field: Field, column: usize) {
        self.columns[field.slot()] = Some(column);
    }

    /// Assign `column` only when `field` is still absent
    pub fn set_if_absent(&mut self, field: Field, column: usize) {
        self.columns[field.slot()].get_or_insert(column);
    }

    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Name, code and Profile are all present
    pub fn is_main_table(&self) -> bool {
        self.has(Field::Name) && self.has(Field::ConnectionCode) && self.has(Field::Profile)
    }

    /// Profile and all four geometry columns are present
    pub fn is_profile_table(&self) -> bool {
        self.has(Field::Profile) && Field::GEOMETRY.iter().all(|field| self.has(*field))
    }

    /// Shape the map satisfies, main tables take precedence
    pub fn classify(&self) -> Option<TableKind> {
        if self.is_main_table() {
            Some(TableKind::Main)
        } else if self.is_profile_table() {
            Some(TableKind::ProfileReference)
        } else {
            None
        }
    }

    /// Number of coefficient columns already mapped
    pub fn coefficient_count(&self) -> usize {
        Field::COEFFICIENTS
            .iter()
            .filter(|field| self.has(**field))
            .count()
    }

    /// Present fields with their column, in record order
    pub fn resolved(&self) -> impl Iterator<Item = (Field, usize)> + '_ {
        Field::ALL
            .iter()
            .filter_map(|field| self.get(*field).map(|column| (*field, column)))
    }
}
