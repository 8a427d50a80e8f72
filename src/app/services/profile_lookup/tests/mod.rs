//! Tests for the profile lookup
//!
//! Insertion semantics, tiered resolution and loading.

pub mod loader_tests;

use crate::app::models::Geometry;
use crate::app::services::profile_lookup::ProfileLookup;

/// Geometry whose height identifies the entry in assertions
pub fn geometry(height: f64) -> Geometry {
    Geometry::new(height, height / 2.0, 4.0, 6.0)
}

/// Lookup built from `(key, height)` pairs in the given order
pub fn create_test_lookup(entries: &[(&str, f64)]) -> ProfileLookup {
    entries
        .iter()
        .map(|(key, height)| (*key, geometry(*height)))
        .collect()
}
