//! ASCII stacked area chart for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each category gets one glyph; areas are stacked in category order from the
//! bottom up. Axis labels come from the formatters published with the state.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::app::pipeline::AxisFormatters;
use crate::domain::{ChartState, VALUE_AXIS_HEADROOM};

const GLYPHS: [char; 10] = ['#', '*', '+', 'o', '=', '%', '@', 'x', '~', ':'];

pub fn glyph(index: usize) -> char {
    GLYPHS[index % GLYPHS.len()]
}

/// Render the stacked areas of `state` into a `width` x `height` grid plus axes.
pub fn render_area_chart(
    state: &ChartState,
    formatters: AxisFormatters,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(3);

    let categories: Vec<&str> = state.categories().collect();
    let columns = stacked_columns(state, &categories);
    let top = columns
        .iter()
        .filter_map(|(_, stack)| stack.last().copied())
        .fold(0.0_f64, f64::max)
        * VALUE_AXIS_HEADROOM;

    if columns.is_empty() || top <= 0.0 {
        return "Plot: (no positive values to draw)\n".to_string();
    }

    let mut grid = vec![vec![' '; width]; height];
    for (x, col) in grid_columns(columns.len(), width).into_iter().enumerate() {
        let stack = &columns[col].1;
        for (row, cells) in grid.iter_mut().enumerate() {
            // Sample the value at the vertical center of the cell.
            let v = top * (height - row) as f64 / height as f64 - top / (2.0 * height as f64);
            if let Some(k) = stack.iter().position(|&upper| v < upper) {
                cells[x] = glyph(k);
            }
        }
    }

    let top_label = (formatters.value)(top);
    let mid_label = (formatters.value)(top / 2.0);
    let zero_label = (formatters.value)(0.0);
    let label_w = [&top_label, &mid_label, &zero_label]
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str("Volume (stacked)\n");
    for (row, cells) in grid.into_iter().enumerate() {
        let label = if row == 0 {
            top_label.as_str()
        } else if row == height / 2 {
            mid_label.as_str()
        } else if row == height - 1 {
            zero_label.as_str()
        } else {
            ""
        };
        let line: String = cells.into_iter().collect();
        out.push_str(format!("{label:>label_w$} |{line}").trim_end());
        out.push('\n');
    }

    out.push_str(&format!("{:>label_w$} +{}\n", "", "-".repeat(width)));

    let first = (formatters.date)(columns[0].0);
    let last = (formatters.date)(columns[columns.len() - 1].0);
    let gap = width.saturating_sub(first.chars().count() + last.chars().count()).max(1);
    if columns.len() > 1 {
        out.push_str(&format!("{:>label_w$}  {first}{}{last}\n", "", " ".repeat(gap)));
    } else {
        out.push_str(&format!("{:>label_w$}  {first}\n", ""));
    }

    let legend: Vec<String> = categories
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{} {name}", glyph(i)))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join("  ")));

    out
}

/// Per date (ascending): cumulative upper bounds in category order.
///
/// Negative values contribute nothing to the stack.
fn stacked_columns(state: &ChartState, categories: &[&str]) -> Vec<(NaiveDate, Vec<f64>)> {
    let index: HashMap<&str, usize> = categories.iter().enumerate().map(|(i, c)| (*c, i)).collect();

    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for p in &state.long_series {
        let row = by_date
            .entry(p.date)
            .or_insert_with(|| vec![0.0; categories.len()]);
        if let Some(&i) = index.get(p.category.as_str()) {
            row[i] += p.value.max(0.0);
        }
    }

    by_date
        .into_iter()
        .map(|(date, mut stack)| {
            let mut acc = 0.0;
            for upper in &mut stack {
                acc += *upper;
                *upper = acc;
            }
            (date, stack)
        })
        .collect()
}

/// Map each of `width` grid columns to the nearest data column.
fn grid_columns(n: usize, width: usize) -> Vec<usize> {
    if n <= 1 {
        return vec![0; width];
    }
    (0..width)
        .map(|x| {
            let u = x as f64 / (width as f64 - 1.0);
            (u * (n as f64 - 1.0)).round() as usize
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryStat, Point};

    fn stat(name: &str) -> CategoryStat {
        CategoryStat {
            category: name.to_string(),
            total_value: 0.0,
            change_label: "N/A".to_string(),
            color: "#000".to_string(),
        }
    }

    fn state() -> ChartState {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let p = |date, category: &str, value| Point {
            date,
            category: category.to_string(),
            value,
        };
        ChartState {
            long_series: vec![p(d1, "A", 500.0), p(d1, "B", 500.0), p(d2, "A", 2500.0), p(d2, "B", 2500.0)],
            stats: vec![stat("A"), stat("B")],
            max_value: 2500.0,
        }
    }

    #[test]
    fn grid_columns_spread_evenly() {
        assert_eq!(grid_columns(2, 4), vec![0, 0, 1, 1]);
        assert_eq!(grid_columns(1, 3), vec![0, 0, 0]);
        assert_eq!(grid_columns(3, 5), vec![0, 1, 1, 2, 2]);
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_area_chart(&state(), AxisFormatters::default(), 10, 6);
        let expected = concat!(
            "Volume (stacked)\n",
            "$6K |\n",
            "    |     *****\n",
            "    |     *****\n",
            "$3K |     *****\n",
            "    |     #####\n",
            " $0 |*****#####\n",
            "    +----------\n",
            "     Jan-2024 Feb-2024\n",
            "Legend: # A  * B\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn stacks_sum_repeated_points_in_date_order() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let p = |date, category: &str, value| Point {
            date,
            category: category.to_string(),
            value,
        };
        let state = ChartState {
            long_series: vec![
                p(d2, "B", 4.0),
                p(d1, "A", 1.0),
                p(d1, "A", 2.0),
                p(d1, "B", -5.0),
                p(d2, "Z", 100.0),
            ],
            stats: vec![stat("A"), stat("B")],
            max_value: 100.0,
        };
        assert_eq!(
            stacked_columns(&state, &["A", "B"]),
            vec![(d1, vec![3.0, 3.0]), (d2, vec![0.0, 4.0])]
        );
    }

    #[test]
    fn empty_state_renders_placeholder() {
        let empty = ChartState {
            long_series: Vec::new(),
            stats: Vec::new(),
            max_value: 0.0,
        };
        assert_eq!(
            render_area_chart(&empty, AxisFormatters::default(), 20, 5),
            "Plot: (no positive values to draw)\n"
        );
    }
}
