//! Profile lookup for geometry enrichment
//!
//! Maps normalized profile designations to their geometry tuple. Keys are
//! case-insensitive and keep their insertion order, which the digit-prefix
//! tier of [`ProfileLookup::resolve`] depends on.
//!
//! - [`loader`] - building the lookup from the reference JSON or records
//! - [`query`] - tiered resolution and the self-check

use crate::app::models::Geometry;
use crate::app::services::normalization::{fold_case, normalize_profile_key};
use std::collections::HashMap;
use std::path::PathBuf;

pub mod loader;
pub mod query;

#[cfg(test)]
pub mod tests;

pub use query::{MatchTier, Resolution, SelfCheck};

/// Read-only mapping from normalized profile key to geometry
#[derive(Debug, Clone, Default)]
pub struct ProfileLookup {
    /// Normalized keys with their geometry, in insertion order
    pub(crate) entries: Vec<(String, Geometry)>,

    /// Case-folded key to position in `entries`
    pub(crate) index: HashMap<String, usize>,

    /// File the lookup was loaded from, if any
    pub(crate) source: Option<PathBuf>,
}

impl ProfileLookup {
    /// Create an empty lookup
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile under its normalized key
    ///
    /// Blank keys are ignored. A key already present (case-insensitively)
    /// takes the new geometry but keeps its original position.
    ///
    /// Returns `true` when the key was not present before.
    pub fn insert(&mut self, raw_key: &str, geometry: Geometry) -> bool {
        let key = normalize_profile_key(raw_key);
        if key.is_empty() {
            return false;
        }

        let folded = fold_case(&key);
        match self.index.get(&folded) {
            Some(&position) => {
                self.entries[position].1 = geometry;
                false
            }
            None => {
                self.index.insert(folded, self.entries.len());
                self.entries.push((key, geometry));
                true
            }
        }
    }

    /// Geometry stored under exactly `key` (case-insensitive, after normalization)
    pub fn get(&self, key: &str) -> Option<Geometry> {
        self.position(&normalize_profile_key(key))
            .map(|position| self.entries[position].1)
    }

    pub(crate) fn position(&self, normalized: &str) -> Option<usize> {
        if normalized.is_empty() {
            return None;
        }
        self.index.get(&fold_case(normalized)).copied()
    }

    /// Number of distinct profiles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Geometry)> {
        self.entries.iter().map(|(key, geometry)| (key.as_str(), geometry))
    }

    /// File the lookup was loaded from
    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }
}

impl<K: AsRef<str>> FromIterator<(K, Geometry)> for ProfileLookup {
    fn from_iter<I: IntoIterator<Item = (K, Geometry)>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for (key, geometry) in iter {
            lookup.insert(key.as_ref(), geometry);
        }
        lookup
    }
}
