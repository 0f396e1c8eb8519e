//! Reporting utilities: formatters and terminal summaries.
//!
//! We keep formatting code in one place so:
//! - the pipeline stages stay free of presentation concerns
//! - output changes are localized (the tables below have golden tests)

pub mod format;

pub use format::{format_currency, format_month_label};

use crate::domain::{CategoryStat, ChartState};

/// Run header: counts, covered months and value-axis bounds.
pub fn format_run_summary(state: &ChartState, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== vol - category volumes ===\n");
    out.push_str(&format!("Source: {source}\n"));

    let dates = state.dates();
    out.push_str(&format!(
        "Rows: {} | Categories: {} | Points: {}\n",
        dates.len(),
        state.stats.len(),
        state.long_series.len()
    ));

    match state.date_range() {
        Some((first, last)) => out.push_str(&format!(
            "Range: {} .. {}\n",
            format_month_label(first),
            format_month_label(last)
        )),
        None => out.push_str("Range: (empty)\n"),
    }

    out.push_str(&format!(
        "Max: {} | Axis: {}\n",
        format_currency(state.max_value),
        format_currency(state.axis_max())
    ));

    out
}

/// Per-category table: total, change and assigned color.
pub fn format_stats_table(stats: &[CategoryStat]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<16} {:>12} {:>8} {:<10}\n", "category", "total", "change", "color").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<16} {:-<12} {:-<8} {:-<10}\n", "", "", "", "").trim_end());
    out.push('\n');

    for s in stats {
        out.push_str(
            format!(
                "{:<16} {:>12} {:>8} {:<10}\n",
                truncate(&s.category, 16),
                format_currency(s.total_value),
                s.change_label,
                s.color,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
