//! Wide -> long reshaping.

use crate::domain::{Observation, Point};

/// Emit one `Point` per (observation, category), keeping observation order and
/// then category order within each observation.
pub fn flatten(observations: &[Observation]) -> Vec<Point> {
    let len = observations.iter().map(|o| o.values.len()).sum();
    let mut out = Vec::with_capacity(len);
    for obs in observations {
        for (category, value) in &obs.values {
            out.push(Point {
                date: obs.date,
                category: category.clone(),
                value: *value,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(month: u32, values: &[(&str, f64)]) -> Observation {
        Observation {
            date: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            values: values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn flatten_preserves_row_then_column_order() {
        let input = vec![obs(1, &[("BTC", 1.0), ("ETH", 2.0)]), obs(2, &[("BTC", 3.0), ("ETH", 4.0)])];
        let points = flatten(&input);

        let got: Vec<(u32, &str, f64)> = points
            .iter()
            .map(|p| (chrono::Datelike::month(&p.date), p.category.as_str(), p.value))
            .collect();
        assert_eq!(
            got,
            vec![(1, "BTC", 1.0), (1, "ETH", 2.0), (2, "BTC", 3.0), (2, "ETH", 4.0)]
        );
    }

    #[test]
    fn flatten_length_is_rows_times_categories() {
        let input: Vec<Observation> = (1..=5)
            .map(|m| obs(m, &[("A", 1.0), ("B", 2.0), ("C", 3.0)]))
            .collect();
        assert_eq!(flatten(&input).len(), 15);
        assert!(flatten(&[]).is_empty());
    }
}
