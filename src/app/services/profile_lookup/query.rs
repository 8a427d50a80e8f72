//! Tiered profile resolution
//!
//! Resolution tries, in order, first hit wins:
//!
//! 1. the normalized designation as an exact key,
//! 2. its digits alone as an exact key,
//! 3. the first key (insertion order) starting with those digits,
//! 4. the first key whose own digits start with those digits.
//!
//! Tier 4 catches designations whose punctuation differs from the key, such
//! as `10-Б1` against `10Б1-В`. Keys it finds are invisible to tiers 1 to 3,
//! so it patches designations a literal digit-prefix search leaves at default
//! geometry. It only runs after tier 3 misses.

use super::ProfileLookup;
use crate::app::models::Geometry;
use crate::app::services::normalization::{
    extract_digits, fold_case, normalize_profile_key, starts_with_ignore_case,
};
use tracing::{info, warn};

/// Tier that produced a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchTier {
    /// Normalized designation equals a key
    Exact,
    /// Digits of the designation equal a key
    Digits,
    /// Tier 3: a key starts with the digits
    DigitPrefix,
    /// Tier 4: the digits of a key start with the digits
    DigitProjection,
}

/// A successful profile resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a> {
    /// Lookup key that matched
    pub key: &'a str,
    pub geometry: Geometry,
    pub tier: MatchTier,
}

/// Outcome of checking the lookup against a known designation
#[derive(Debug, Clone, PartialEq)]
pub enum SelfCheck {
    Found { key: String, geometry: Geometry },
    /// Designation missed; keys containing its digits, for diagnosis
    Missing { digits: String, candidates: Vec<String> },
}

impl ProfileLookup {
    /// Resolve a raw profile designation
    ///
    /// Returns `None` when every tier misses; callers leave geometry at its
    /// defaults in that case.
    pub fn resolve(&self, raw: &str) -> Option<Resolution<'_>> {
        let normalized = normalize_profile_key(raw);
        if normalized.is_empty() {
            return None;
        }

        if let Some(position) = self.position(&normalized) {
            return Some(self.resolution(position, MatchTier::Exact));
        }

        let digits = extract_digits(&normalized);
        if digits.is_empty() {
            return None;
        }

        if let Some(position) = self.position(&digits) {
            return Some(self.resolution(position, MatchTier::Digits));
        }

        if let Some(position) = self
            .entries
            .iter()
            .position(|(key, _)| starts_with_ignore_case(key, &digits))
        {
            return Some(self.resolution(position, MatchTier::DigitPrefix));
        }

        self.entries
            .iter()
            .position(|(key, _)| extract_digits(key).starts_with(&digits))
            .map(|position| self.resolution(position, MatchTier::DigitProjection))
    }

    /// Geometry for a raw designation, if any tier resolves it
    pub fn resolve_geometry(&self, raw: &str) -> Option<Geometry> {
        self.resolve(raw).map(|resolution| resolution.geometry)
    }

    /// Up to `limit` keys containing `digits` (case-insensitive), insertion order
    pub fn keys_containing(&self, digits: &str, limit: usize) -> Vec<&str> {
        if digits.trim().is_empty() {
            return Vec::new();
        }
        let needle = fold_case(digits);
        self.keys()
            .filter(|key| fold_case(key).contains(&needle))
            .take(limit)
            .collect()
    }

    /// Resolve `designation` and log the outcome
    ///
    /// On a miss, up to `sample_limit` keys containing the designation's digits are
    /// reported to help diagnose a reference table that was read incorrectly.
    pub fn self_check(&self, designation: &str, sample_limit: usize) -> SelfCheck {
        if let Some(resolution) = self.resolve(designation) {
            let g = resolution.geometry;
            info!(
                "Self-check Profile={} => H={}, B={}, s={}, t={} (key '{}', {:?})",
                designation,
                g.height,
                g.width,
                g.web_thickness,
                g.flange_thickness,
                resolution.key,
                resolution.tier
            );
            return SelfCheck::Found {
                key: resolution.key.to_string(),
                geometry: g,
            };
        }

        let digits = extract_digits(&normalize_profile_key(designation));
        let candidates: Vec<String> = self
            .keys_containing(&digits, sample_limit)
            .into_iter()
            .map(str::to_string)
            .collect();

        warn!("Self-check Profile={} => not found in profile lookup", designation);
        if !candidates.is_empty() {
            warn!(
                "Closest keys containing digits '{}': {}",
                digits,
                candidates.join(", ")
            );
        }

        SelfCheck::Missing { digits, candidates }
    }

    fn resolution(&self, position: usize, tier: MatchTier) -> Resolution<'_> {
        let (key, geometry) = &self.entries[position];
        Resolution {
            key,
            geometry: *geometry,
            tier,
        }
    }
}
