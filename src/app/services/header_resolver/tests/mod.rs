//! Tests for header resolution
//!
//! Named matching, classification and the positional fallbacks.

pub mod resolver_tests;

/// Build an owned header row from string literals
pub fn header(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|token| token.to_string()).collect()
}

/// Main-table header with every column labelled
pub fn create_full_main_header() -> Vec<String> {
    header(&[
        "Name", "CONNECTION_CODE", "Profile", "Nt", "Nc", "N", "Qo", "Q", "T", "M", "variable",
        "Sj", "Sjo", "Mneg", "Mo", "α", "β", "γ", "δ", "ε", "λ",
    ])
}

/// Main-table header whose Greek labels were lost to `?`
pub fn create_corrupted_main_header() -> Vec<String> {
    header(&[
        "Name", "CONNECTION_CODE", "Profile", "Nt", "Nc", "N", "Qo", "Q", "M", "variable", "Sj",
        "Sjo", "Mneg", "Mo", "?", "?", "?", "?", "?", "?",
    ])
}
