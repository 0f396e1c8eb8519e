//! Export the published state.
//!
//! - JSON: the whole `ChartState`, for a renderer running elsewhere
//! - CSV: the long series only, easy to consume in spreadsheets

use std::fs::File;
use std::path::Path;

use crate::domain::{ChartState, Point};
use crate::error::AppError;

/// Write the state as pretty-printed JSON.
pub fn write_state_json(path: &Path, state: &ChartState) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create state JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, state)
        .map_err(|e| AppError::new(2, format!("Failed to write state JSON: {e}")))?;
    Ok(())
}

/// Write `date,category,value` rows.
pub fn write_long_csv(path: &Path, points: &[Point]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for p in points {
        writer
            .serialize(p)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
