//! Swedish-formatted amounts: `1 234,50` in, `1234.50` out.

/// Parses an amount written with space thousands separators and a decimal
/// comma. Blank cells count as zero.
///
/// Returns `None` when the cell holds anything other than a plain decimal
/// number. Exponent forms such as `1e3` are rejected too; Fortnox never
/// writes them.
pub fn parse_amount(cell: &str) -> Option<f64> {
    let normalized: String = cell
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '\u{a0}'))
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();

    if normalized.is_empty() {
        return Some(0.0);
    }

    // `f64::from_str` also accepts "inf" and "NaN", which never appear in an export.
    if !normalized
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-' | '+'))
    {
        return None;
    }

    normalized.parse().ok()
}

/// Formats an amount with two decimals and a decimal point.
pub fn format_amount(value: f64) -> String {
    let rendered = format!("{:.2}", value);
    // -0.001 and -0.0 both round to a signed zero.
    if rendered.trim_start_matches('-').chars().all(|ch| matches!(ch, '0' | '.')) {
        return rendered.trim_start_matches('-').to_string();
    }
    rendered
}
