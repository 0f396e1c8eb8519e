//! `vol-area` library crate.
//!
//! The binary (`vol`) is a thin wrapper around this library so that:
//!
//! - the pipeline stages are testable without spawning processes
//! - a renderer other than the terminal can consume `ChartState` directly
//! - code stays easy to navigate as the project grows
//!
//! Pipeline: `io::decode` -> `io::normalize` -> `series::flatten` ->
//! `series::aggregate`, sequenced by `app::pipeline`.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod series;
