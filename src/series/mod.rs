//! Series transforms: wide -> long reshaping and per-category aggregation.

pub mod aggregate;
pub mod reshape;

pub use aggregate::{aggregate, check_palette, max_value};
pub use reshape::flatten;
