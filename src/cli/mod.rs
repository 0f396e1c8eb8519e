//! Command-line parsing for the `vol` binary.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vol", version, about = "Spreadsheet volume series -> chart-ready summary")]
pub struct Cli {
    /// Log pipeline stages to stderr (same as RUST_LOG=debug).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a CSV, print the per-category summary and an ASCII chart.
    Show(ShowArgs),
    /// Print a synthetic wide-format CSV (or write it to a file).
    Sample(SampleArgs),
}

/// Where the CSV comes from. The first one given wins, in field order;
/// with none, `SHEET_ID` from the environment is used.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Local CSV file.
    #[arg(long, value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Any URL returning CSV text.
    #[arg(long)]
    pub url: Option<String>,

    /// Use generated sample data instead of a real source.
    #[arg(long)]
    pub sample: bool,

    /// Google spreadsheet id (overrides SHEET_ID).
    #[arg(long)]
    pub sheet_id: Option<String>,

    /// Sheet (tab) name used with --sheet-id (overrides SHEET_NAME).
    #[arg(long)]
    pub sheet_name: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Comma-separated color tokens replacing the default palette.
    #[arg(long)]
    pub palette: Option<String>,

    /// Print the state as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Disable the terminal chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Export the published state to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the long series (date,category,value) to CSV.
    #[arg(long = "export-long")]
    pub export_long: Option<PathBuf>,

    /// Seed for --sample.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Row count for --sample.
    #[arg(long, default_value_t = 24)]
    pub rows: usize,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of monthly rows.
    #[arg(short = 'n', long, default_value_t = 24)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First date (YYYY-MM-DD).
    #[arg(long, default_value = "2023-01-01")]
    pub start: NaiveDate,

    /// Comma-separated category names.
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Month-over-month log-volatility.
    #[arg(long, default_value_t = 0.15)]
    pub volatility: f64,

    /// Write to this file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_source_and_palette() {
        let cli = Cli::parse_from(["vol", "show", "--file", "data.csv", "--palette", "#111,#222", "--no-plot"]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.source.file, Some(PathBuf::from("data.csv")));
        assert_eq!(args.palette.as_deref(), Some("#111,#222"));
        assert!(args.no_plot);
        assert_eq!(args.width, 72);
    }

    #[test]
    fn parses_sample_categories_and_start() {
        let cli = Cli::parse_from(["vol", "-v", "sample", "--categories", "A,B,C", "--start", "2024-05-01"]);
        assert!(cli.verbose);
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.categories, vec!["A", "B", "C"]);
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }
}
