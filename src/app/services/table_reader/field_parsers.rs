//! Culture-tolerant numeric parsing for spreadsheet exports
//!
//! Source tables mix invariant (`1,234.5`) and decimal-comma (`1 234,5`)
//! number formats, sometimes within one file. Unparseable cells read as zero,
//! matching how blank cells are treated.

/// Group separators accepted in decimal-comma numbers
const GROUP_SEPARATORS: &[char] = &[' ', '\u{00A0}', '\u{202F}'];

/// Trimmed cell text, empty when the column is absent or out of range
pub fn cell(row: &[String], column: Option<usize>) -> &str {
    column
        .and_then(|index| row.get(index))
        .map(|value| value.trim())
        .unwrap_or("")
}

/// Parse a floating point cell
///
/// Blank is zero. Text containing a comma is tried as decimal-comma first,
/// then every value is tried as invariant, then as decimal-comma. Anything
/// else is zero.
pub fn parse_float(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    if text.contains(',') {
        if let Some(value) = parse_decimal_comma(text) {
            return value;
        }
    }

    parse_invariant(text)
        .or_else(|| parse_decimal_comma(text))
        .unwrap_or(0.0)
}

/// Parse an integer cell
///
/// Plain integers parse directly (group spaces allowed); otherwise the float
/// parser's result is rounded half to even. Anything else is zero.
pub fn parse_int(text: &str) -> i32 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }

    if let Ok(value) = text.parse::<i32>() {
        return value;
    }

    let ungrouped: String = text.chars().filter(|c| !GROUP_SEPARATORS.contains(c)).collect();
    if let Ok(value) = ungrouped.parse::<i32>() {
        return value;
    }

    let value = parse_float(text);
    if value != 0.0 {
        value.round_ties_even() as i32
    } else {
        0
    }
}

/// Invariant format: `.` decimal point, `,` group separators in the integer part
fn parse_invariant(text: &str) -> Option<f64> {
    let split = text.find(['.', 'e', 'E']).unwrap_or(text.len());
    let (integer_part, rest) = text.split_at(split);
    if rest.contains(',') || integer_part.ends_with(',') {
        return None;
    }

    let cleaned = format!("{}{}", integer_part.replace(',', ""), rest);
    finite(cleaned.parse::<f64>().ok()?)
}

/// Decimal-comma format: `,` decimal point, spaces as group separators
fn parse_decimal_comma(text: &str) -> Option<f64> {
    if text.contains('.') {
        return None;
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !GROUP_SEPARATORS.contains(c))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    finite(cleaned.parse::<f64>().ok()?)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
