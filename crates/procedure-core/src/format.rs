//! Display helpers: BRL currency, month names, chart labels and tooltips

use crate::constants;

/// Format an amount as Brazilian Real, matching `Intl.NumberFormat('pt-BR',
/// { style: 'currency', currency: 'BRL' })`: `R$\u{a0}1.234,56`.
pub fn format_brl(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    // -0.001 rounds to zero and must not print a sign
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!("{sign}R$\u{a0}{},{frac_part}", group_thousands(int_part))
}

/// Insert `.` every three digits from the right
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Plain number for counts and non-monetary tooltip values ("3", "2.5")
pub fn format_plain(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

pub fn month_abbreviation(month: u32) -> Option<&'static str> {
    constants::MONTH_ABBREVIATIONS
        .get((month as usize).wrapping_sub(1))
        .copied()
}

pub fn month_name(month: u32) -> Option<&'static str> {
    constants::MONTH_NAMES.get((month as usize).wrapping_sub(1)).copied()
}

/// Shorten long procedure names for chart axes: first 15 chars + "..."
pub fn short_label(name: &str) -> String {
    if name.chars().count() > constants::SHORT_LABEL_CHARS {
        let head: String = name.chars().take(constants::SHORT_LABEL_CHARS).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// True for series whose values are money (their name mentions "valor")
pub fn is_currency_series(name: &str) -> bool {
    name.to_lowercase().contains("valor")
}

/// Format a value according to the series it belongs to
pub fn format_series_value(series_name: &str, value: f64) -> String {
    if is_currency_series(series_name) {
        format_brl(value)
    } else {
        format_plain(value)
    }
}

/// Tooltip text for a hovered chart point: the label, then `name: value`
/// for every series at that point.
pub fn tooltip_lines(label: &str, entries: &[(&str, f64)]) -> Vec<String> {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(label.to_string());
    for (name, value) in entries {
        lines.push(format!("{}: {}", name, format_series_value(name, *value)));
    }
    lines
}
