//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced fresh by every pipeline run
//! - exported to JSON/CSV
//! - handed to a renderer without further conversion

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reserved column holding the observation date. Every other column is a category.
pub const DATE_COLUMN: &str = "Date";

/// Placeholder shown for the period-over-period change until a comparison
/// period is defined.
pub const CHANGE_PLACEHOLDER: &str = "N/A";

/// Headroom applied on top of the largest value when sizing a value axis.
pub const VALUE_AXIS_HEADROOM: f64 = 1.2;

/// One decoded CSV row: column name -> raw cell text, in header order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line in the source text where this record starts.
    pub line: usize,
    pub fields: Vec<(String, String)>,
}

impl RawRecord {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Non-date column names in header order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| *name != DATE_COLUMN)
    }
}

/// A typed wide row: one date and one value per category.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub values: Vec<(String, f64)>,
}

/// A long-format observation: one `(date, category, value)` triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub date: NaiveDate,
    pub category: String,
    pub value: f64,
}

/// Per-category summary shown next to the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub total_value: f64,
    pub change_label: String,
    pub color: String,
}

/// Ordered color tokens assigned to categories by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Arc<[String]>);

impl Palette {
    /// Default categorical scheme (ten colors).
    pub const DEFAULT_COLORS: [&'static str; 10] = [
        "#4269d0", "#efb118", "#ff725c", "#6cc5b0", "#3ca951", "#ff8ab7", "#a463f2", "#97bbf5",
        "#9c6b4e", "#9498a0",
    ];

    pub fn new<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(colors.into_iter().map(Into::into).collect())
    }

    /// Parse a comma-separated list (`"#111,#222"`), ignoring blank entries.
    pub fn parse_list(s: &str) -> Self {
        Self::new(
            s.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty()),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COLORS)
    }
}

/// Published output of one successful pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartState {
    pub long_series: Vec<Point>,
    pub stats: Vec<CategoryStat>,
    pub max_value: f64,
}

impl ChartState {
    /// Upper bound for the value axis (`max_value` plus headroom).
    pub fn axis_max(&self) -> f64 {
        self.max_value * VALUE_AXIS_HEADROOM
    }

    /// Category names in display order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.stats.iter().map(|s| s.category.as_str())
    }

    /// Distinct dates of the long series, in series order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut seen = HashSet::new();
        self.long_series
            .iter()
            .map(|p| p.date)
            .filter(|d| seen.insert(*d))
            .collect()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.long_series.iter().map(|p| p.date).min()?;
        let max = self.long_series.iter().map(|p| p.date).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RawRecord {
        RawRecord {
            line: 2,
            fields: vec![
                ("Date".to_string(), "2024-01-01".to_string()),
                ("BTC".to_string(), "1".to_string()),
                ("ETH".to_string(), "2".to_string()),
            ],
        }
    }

    #[test]
    fn raw_record_categories_skip_date() {
        let r = record();
        let cats: Vec<&str> = r.categories().collect();
        assert_eq!(cats, vec!["BTC", "ETH"]);
        assert_eq!(r.get("ETH"), Some("2"));
        assert_eq!(r.get("SOL"), None);
    }

    #[test]
    fn palette_parse_list_trims_and_skips_blanks() {
        let p = Palette::parse_list(" #111, ,#222,");
        assert_eq!(p.colors(), &["#111".to_string(), "#222".to_string()]);
        assert_eq!(Palette::default().len(), 10);
    }

    #[test]
    fn axis_max_applies_headroom() {
        let state = ChartState {
            long_series: Vec::new(),
            stats: Vec::new(),
            max_value: 100.0,
        };
        assert!((state.axis_max() - 120.0).abs() < 1e-9);
        assert!(state.date_range().is_none());
    }

    #[test]
    fn dates_are_distinct_in_series_order() {
        let d1 = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let d0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let p = |date, category: &str| Point {
            date,
            category: category.to_string(),
            value: 1.0,
        };
        let state = ChartState {
            long_series: vec![p(d1, "A"), p(d1, "B"), p(d0, "A"), p(d0, "B")],
            stats: Vec::new(),
            max_value: 1.0,
        };
        assert_eq!(state.dates(), vec![d1, d0]);
        assert_eq!(state.date_range(), Some((d0, d1)));
    }

    #[test]
    fn dates_of_a_long_daily_series() {
        let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let long_series: Vec<Point> = (0..3_650)
            .flat_map(|day| {
                let date = start + chrono::Days::new(day);
                (0..10).map(move |c| Point {
                    date,
                    category: format!("C{c}"),
                    value: 1.0,
                })
            })
            .collect();
        let state = ChartState {
            long_series,
            stats: Vec::new(),
            max_value: 1.0,
        };
        let dates = state.dates();
        assert_eq!(dates.len(), 3_650);
        assert_eq!(dates[0], start);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }
}
