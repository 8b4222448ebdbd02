/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::format_count;
///
/// assert_eq!(format_count(7), "7");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Format a percentage in `[0, 100]` with two decimals and a `%` suffix.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::format_percent;
///
/// assert_eq!(format_percent(60.0), "60.00%");
/// assert_eq!(format_percent(33.333333), "33.33%");
/// assert_eq!(format_percent(0.0), "0.00%");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Upper-case the first character and lower-case the rest, for display of
/// normalised labels.
///
/// # Examples
///
/// ```
/// use stats_core::formatting::capitalize;
///
/// assert_eq!(capitalize("car theft"), "Car theft");
/// assert_eq!(capitalize("MARKET"), "Market");
/// assert_eq!(capitalize(""), "");
/// ```
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
