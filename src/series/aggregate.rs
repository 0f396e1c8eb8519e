//! Per-category summary statistics.

use std::collections::HashMap;

use crate::domain::{CHANGE_PLACEHOLDER, CategoryStat, Palette, Point};
use crate::error::ConfigurationError;

/// Check that every category can get its own palette color.
pub fn check_palette(category_count: usize, palette: &Palette) -> Result<(), ConfigurationError> {
    if palette.is_empty() {
        return Err(ConfigurationError::EmptyPalette);
    }
    if category_count > palette.len() {
        return Err(ConfigurationError::PaletteTooSmall {
            categories: category_count,
            palette: palette.len(),
        });
    }
    Ok(())
}

/// Total value per category, in `category_order`, with the color at the same
/// palette position.
///
/// A category with no points totals `0.0`. Points whose category is not in
/// `category_order` are ignored.
pub fn aggregate(
    points: &[Point],
    category_order: &[String],
    palette: &Palette,
) -> Result<Vec<CategoryStat>, ConfigurationError> {
    check_palette(category_order.len(), palette)?;

    let index: HashMap<&str, usize> = category_order
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut totals = vec![0.0_f64; category_order.len()];
    let mut ignored = 0usize;
    for p in points {
        match index.get(p.category.as_str()) {
            Some(&i) => totals[i] += p.value,
            None => ignored += 1,
        }
    }
    if ignored > 0 {
        tracing::warn!(ignored, "points with unknown categories left out of totals");
    }

    let mut stats = Vec::with_capacity(category_order.len());
    for (i, (category, total_value)) in category_order.iter().zip(totals).enumerate() {
        let color = palette
            .get(i)
            .ok_or(ConfigurationError::PaletteTooSmall {
                categories: category_order.len(),
                palette: palette.len(),
            })?
            .to_string();
        stats.push(CategoryStat {
            category: category.clone(),
            total_value,
            change_label: CHANGE_PLACEHOLDER.to_string(),
            color,
        });
    }
    Ok(stats)
}

/// Largest point value, `0.0` for an empty series.
pub fn max_value(points: &[Point]) -> f64 {
    points
        .iter()
        .map(|p| p.value)
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(day: u32, category: &str, value: f64) -> Point {
        Point {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            category: category.to_string(),
            value,
        }
    }

    fn order(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn totals_follow_category_order_and_palette_position() {
        let points = vec![
            point(1, "ETH", 2.0),
            point(1, "BTC", 10.0),
            point(2, "ETH", 3.0),
            point(2, "BTC", 5.0),
        ];
        let palette = Palette::new(["red", "green", "blue"]);
        let stats = aggregate(&points, &order(&["ETH", "BTC"]), &palette).unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].category, "ETH");
        assert_eq!(stats[0].total_value, 5.0);
        assert_eq!(stats[0].color, "red");
        assert_eq!(stats[1].category, "BTC");
        assert_eq!(stats[1].total_value, 15.0);
        assert_eq!(stats[1].color, "green");
        assert!(stats.iter().all(|s| s.change_label == "N/A"));
    }

    #[test]
    fn absent_category_totals_zero_and_unknown_points_are_ignored() {
        let points = vec![point(1, "BTC", 1.0), point(1, "DOGE", 99.0)];
        let stats = aggregate(&points, &order(&["BTC", "ETH"]), &Palette::default()).unwrap();
        assert_eq!(stats[1].category, "ETH");
        assert_eq!(stats[1].total_value, 0.0);
        assert_eq!(stats[0].total_value, 1.0);
    }

    #[test]
    fn too_many_categories_fail_fast() {
        let palette = Palette::new(["a", "b"]);
        let err = aggregate(&[], &order(&["X", "Y", "Z"]), &palette).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::PaletteTooSmall {
                categories: 3,
                palette: 2
            }
        );
        assert_eq!(
            aggregate(&[], &order(&["X"]), &Palette::new(Vec::<String>::new())),
            Err(ConfigurationError::EmptyPalette)
        );
    }

    #[test]
    fn totals_conserve_the_series_sum() {
        let points: Vec<Point> = (1..=10)
            .flat_map(|d| {
                [
                    point(d, "A", d as f64 * 1.5),
                    point(d, "B", 1000.0 / d as f64),
                ]
            })
            .collect();
        let stats = aggregate(&points, &order(&["A", "B"]), &Palette::default()).unwrap();
        let series_sum: f64 = points.iter().map(|p| p.value).sum();
        let stats_sum: f64 = stats.iter().map(|s| s.total_value).sum();
        assert!((series_sum - stats_sum).abs() < 1e-9);
    }

    #[test]
    fn max_value_handles_empty_and_negative_series() {
        assert_eq!(max_value(&[]), 0.0);
        assert_eq!(max_value(&[point(1, "A", -3.0), point(2, "A", -1.0)]), -1.0);
        assert_eq!(max_value(&[point(1, "A", 3.0), point(2, "B", 7.5)]), 7.5);
    }
}
