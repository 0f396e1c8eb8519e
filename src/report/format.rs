//! Axis and label formatters handed to renderers.
//!
//! Both functions are pure and locale-fixed (English month names, `$` prefix).

use chrono::NaiveDate;

const SCALES: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Scaled currency label: `1_250_000.0` -> `"$1.3M"`, `2e9` -> `"$2B"`, `500.0` -> `"$500"`.
///
/// The quotient keeps no decimals when it is a whole number and one decimal
/// otherwise (ties round away from zero). Negative values keep their sign in
/// front of the `$`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    let (quotient, suffix) = SCALES
        .iter()
        .find(|(threshold, _)| magnitude >= *threshold)
        .map(|(threshold, suffix)| (magnitude / threshold, *suffix))
        .unwrap_or((magnitude, ""));

    format!("{sign}${}{suffix}", fmt_quotient(quotient))
}

/// Month label with a hyphen: January 2024 -> `"Jan-2024"`.
pub fn format_month_label(date: NaiveDate) -> String {
    date.format("%b-%Y").to_string()
}

fn fmt_quotient(q: f64) -> String {
    if q.fract() == 0.0 {
        format!("{q:.0}")
    } else {
        // `{:.1}` alone rounds ties to even (1.25 -> "1.2").
        let rounded = (q * 10.0).round() / 10.0;
        format!("{rounded:.1}")
    }
}
