//! Synthetic wide-format volume CSV for demos and offline runs.
//!
//! Each category follows a multiplicative random walk around its own base
//! level. Values are written with `,` thousands separators, the way a
//! spreadsheet export renders formatted numbers.

use chrono::{Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::DATE_COLUMN;
use crate::error::AppError;

pub const DEFAULT_CATEGORIES: [&str; 4] = ["BTC/USDT", "ETH/USDT", "SOL/USDT", "XRP/USDT"];

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub categories: Vec<String>,
    pub rows: usize,
    pub start: NaiveDate,
    pub seed: u64,
    /// Month-over-month log-volatility of each walk.
    pub volatility: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
            rows: 24,
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            seed: 42,
            volatility: 0.15,
        }
    }
}

/// Generate the CSV text (header + one row per month).
pub fn generate_sample_csv(config: &SampleConfig) -> Result<String, AppError> {
    if config.categories.is_empty() {
        return Err(AppError::new(2, "Sample needs at least one category."));
    }
    if config.rows == 0 {
        return Err(AppError::new(2, "Sample row count must be > 0."));
    }
    if !(config.volatility.is_finite() && config.volatility >= 0.0) {
        return Err(AppError::new(2, "Sample volatility must be a finite value >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.volatility)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;

    // Base levels spread across a few orders of magnitude so the K/M/B
    // suffixes all show up.
    let mut levels: Vec<f64> = (0..config.categories.len())
        .map(|i| {
            let exponent = 9.0 - (i % 4) as f64;
            10f64.powf(exponent) * rng.gen_range(1.0..5.0)
        })
        .collect();

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    let mut header = vec![DATE_COLUMN.to_string()];
    header.extend(config.categories.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(4, format!("Failed to write sample header: {e}")))?;

    for row in 0..config.rows {
        let months = u32::try_from(row)
            .map_err(|_| AppError::new(2, "Sample row count is too large."))?;
        let date = config
            .start
            .checked_add_months(Months::new(months))
            .ok_or_else(|| AppError::new(2, "Sample dates overflow the calendar."))?;

        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        for level in levels.iter_mut() {
            *level *= normal.sample(&mut rng).exp();
            record.push(group_thousands(level.round() as u64));
        }
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(4, format!("Failed to write sample row: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::new(4, format!("Failed to flush sample CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::new(4, format!("Sample CSV is not UTF-8: {e}")))
}

/// `1234567` -> `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
