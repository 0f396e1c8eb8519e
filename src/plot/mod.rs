//! Terminal plotting.

pub mod ascii;

pub use ascii::render_area_chart;
