//! Text normalization shared by every matching component
//!
//! All functions are pure and total: any input text, including mixed
//! Cyrillic/Latin designations, produces a value and never fails.

/// No-break space as found in spreadsheet exports
const NO_BREAK_SPACE: char = '\u{00A0}';

/// Normalize a profile designation into a lookup key
///
/// Trims the text, treats no-break spaces as ordinary whitespace and removes
/// every whitespace character. Case is preserved; comparisons fold case
/// separately.
///
/// # Examples
///
/// ```
/// use connection_processor::app::services::normalization::normalize_profile_key;
///
/// assert_eq!(normalize_profile_key(" 10\u{00A0}Б 1 "), "10Б1");
/// assert_eq!(normalize_profile_key("   "), "");
/// ```
pub fn normalize_profile_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c == NO_BREAK_SPACE { ' ' } else { c })
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Decimal digits of `text`, in order
pub fn extract_digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Case-folded form used as the key of every case-insensitive map
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Case-insensitive equality
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Case-insensitive prefix test
pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    let mut text = text.chars().flat_map(char::to_lowercase);
    prefix
        .chars()
        .flat_map(char::to_lowercase)
        .all(|p| text.next() == Some(p))
}

/// Trimmed text, `None` when blank
pub fn non_blank(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
