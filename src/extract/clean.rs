//! Value cleaning shared by the log extractors.

/// Strings the pipeline emits in place of a missing value.
const PLACEHOLDERS: [&str; 3] = ["unknown", "n/a", "na"];

/// Trim a raw value and blank it when it is only a placeholder.
pub fn clean_value(value: &str) -> String {
    let trimmed = value.trim();
    if PLACEHOLDERS
        .iter()
        .any(|placeholder| trimmed.eq_ignore_ascii_case(placeholder))
    {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Cleaned value, or `None` when nothing usable remains.
pub fn clean_nonempty(value: &str) -> Option<String> {
    let cleaned = clean_value(value);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Parse as an integer; `None` on failure.
pub fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Parse as a floating-point number; `None` on failure.
pub fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}
