//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - decoded and typed rows (`RawRecord`, `Observation`)
//! - chart-ready outputs (`Point`, `CategoryStat`, `ChartState`)
//! - the color `Palette`

pub mod types;

pub use types::*;
