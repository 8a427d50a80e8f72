//! Tests for named header matching and classification

use super::*;
use crate::app::models::TableKind;
use crate::app::services::header_resolver::{
    CoefficientFallback, Field, HeaderFallback, HeaderResolver, SynonymTable,
};

#[test]
fn test_full_main_header_resolves_by_name() {
    let resolver = HeaderResolver::new();
    let resolved = resolver.resolve(&create_full_main_header()).unwrap();

    assert_eq!(resolved.kind, TableKind::Main);
    assert_eq!(resolved.fallback, HeaderFallback::None);
    assert_eq!(resolved.coefficients, CoefficientFallback::None);
    assert_eq!(resolved.columns.get(Field::Name), Some(0));
    assert_eq!(resolved.columns.get(Field::ConnectionCode), Some(1));
    assert_eq!(resolved.columns.get(Field::Profile), Some(2));
    assert_eq!(resolved.columns.get(Field::Mo), Some(14));
    assert_eq!(resolved.columns.get(Field::Alpha), Some(15));
    assert_eq!(resolved.columns.get(Field::Lambda), Some(20));
}

#[test]
fn test_profile_reference_with_cyrillic_and_case_variants() {
    let resolver = HeaderResolver::new();
    // Cyrillic Н and В, lowercase Cyrillic profile label, uppercase S
    let resolved = resolver
        .resolve(&header(&["профиль", "Н", "В", "S", "t"]))
        .unwrap();

    assert_eq!(resolved.kind, TableKind::ProfileReference);
    assert_eq!(resolved.fallback, HeaderFallback::None);
    assert_eq!(resolved.columns.get(Field::Profile), Some(0));
    assert_eq!(resolved.columns.get(Field::Height), Some(1));
    assert_eq!(resolved.columns.get(Field::Width), Some(2));
    assert_eq!(resolved.columns.get(Field::WebThickness), Some(3));
    assert_eq!(resolved.columns.get(Field::FlangeThickness), Some(4));
}

#[test]
fn test_code_synonyms() {
    let resolver = HeaderResolver::new();
    for spelling in ["CONNECTION_CODE", "connection_code", "Code", "Код", "КОД"] {
        let resolved = resolver
            .resolve(&header(&["Name", spelling, "Profile"]))
            .unwrap();
        assert_eq!(resolved.kind, TableKind::Main, "spelling {spelling}");
        assert_eq!(resolved.columns.get(Field::ConnectionCode), Some(1));
    }
}

#[test]
fn test_leftmost_matching_column_wins() {
    let resolver = HeaderResolver::new();
    let columns = resolver.match_columns(&header(&["Code", "Name", "Profile", "CONNECTION_CODE"]));

    assert_eq!(columns.get(Field::ConnectionCode), Some(0));
}

#[test]
fn test_header_tokens_are_trimmed() {
    let resolver = HeaderResolver::new();
    let resolved = resolver
        .resolve(&header(&[" Name ", "Code\t", "\u{00A0}Profile"]))
        .unwrap();

    assert_eq!(resolved.kind, TableKind::Main);
}

#[test]
fn test_blank_tokens_never_match() {
    let resolver = HeaderResolver::new();
    let columns = resolver.match_columns(&header(&["", "  ", "Name"]));

    assert_eq!(columns.get(Field::Name), Some(2));
    assert_eq!(columns.resolved().count(), 1);
}

#[test]
fn test_main_shape_takes_precedence() {
    let resolver = HeaderResolver::new();
    let resolved = resolver
        .resolve(&header(&["Name", "Code", "Profile", "H", "B", "s", "t"]))
        .unwrap();

    assert_eq!(resolved.kind, TableKind::Main);
    assert!(resolved.columns.is_profile_table());
}

#[test]
fn test_geometry_t_shares_force_column_when_alone() {
    // Only one of t/T is present: both fields take the same column
    let resolver = HeaderResolver::new();
    let resolved = resolver.resolve(&create_full_main_header()).unwrap();

    assert_eq!(resolved.columns.get(Field::T), Some(8));
    assert_eq!(resolved.columns.get(Field::FlangeThickness), Some(8));
}

#[test]
fn test_custom_synonym_table() {
    let synonyms = SynonymTable::default().with_spelling(Field::Name, "Наименование");
    let resolver = HeaderResolver::new().with_synonyms(synonyms);

    let resolved = resolver
        .resolve(&header(&["Наименование", "Код", "Профиль"]))
        .unwrap();
    assert_eq!(resolved.kind, TableKind::Main);
    assert_eq!(resolved.columns.get(Field::Name), Some(0));
}

#[test]
fn test_synonym_table_ignores_repeated_spelling() {
    let synonyms = SynonymTable::default()
        .with_spelling(Field::Profile, "Profile")
        .with_spelling(Field::Profile, "Профиль");

    assert_eq!(synonyms.spellings(Field::Profile).len(), 2);
    assert!(synonyms.matches(Field::Profile, " PROFILE "));
    assert!(!synonyms.matches(Field::Profile, ""));
}

#[test]
fn test_recognizes_uses_named_matching_only() {
    let resolver = HeaderResolver::new();

    assert!(resolver.recognizes(&header(&["Name", "Code", "Profile"])));
    assert!(resolver.recognizes(&header(&["Profile", "H", "B", "s", "t"])));
    // Would resolve through the absolute fallback, but is not a header by name
    assert!(!resolver.recognizes(&header(&["a", "b", "c", "d", "e"])));
}

#[test]
fn test_resolution_is_deterministic() {
    let resolver = HeaderResolver::new();
    let row = create_corrupted_main_header();

    let first = resolver.resolve(&row).unwrap();
    let second = resolver.resolve(&row).unwrap();
    assert_eq!(first, second);
}
