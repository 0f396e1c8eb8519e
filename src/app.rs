//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - picks a transport for the CSV source
//! - runs one pipeline load
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{Command, SampleArgs, ShowArgs, SourceArgs};
use crate::data::sample::DEFAULT_CATEGORIES;
use crate::data::transport::sheet_name_or_env;
use crate::data::{FileTransport, HttpTransport, MemoryTransport, SampleConfig, generate_sample_csv};
use crate::domain::Palette;
use crate::error::AppError;

pub mod pipeline;

use pipeline::ChartPipeline;

/// Entry point for the `vol` binary.
pub fn run() -> Result<(), AppError> {
    // `vol` and `vol --sample` behave like `vol show ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_tracing(cli.verbose);

    // `SHEET_ID` / `SHEET_NAME` may come from a `.env` file.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "ignoring unreadable .env file");
        }
    }

    match cli.command {
        Command::Show(args) => {
            // One load is one unit of async work; a single-threaded runtime is enough.
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| AppError::new(4, format!("Failed to start async runtime: {e}")))?;
            runtime.block_on(handle_show(args))
        }
        Command::Sample(args) => handle_sample(args),
    }
}

/// Compact stderr logs; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,vol_area=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Ignore the error if a subscriber is already installed (tests).
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

async fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let palette = match &args.palette {
        Some(list) => Palette::parse_list(list),
        None => Palette::default(),
    };

    let pipeline = build_pipeline(&args, palette)?;
    let state = pipeline.load().await?;

    if args.json {
        let json = serde_json::to_string_pretty(state.as_ref())
            .map_err(|e| AppError::new(2, format!("Failed to serialize state: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_run_summary(&state, &pipeline.source()));
        println!("{}", crate::report::format_stats_table(&state.stats));

        if !args.no_plot {
            let plot = crate::plot::render_area_chart(
                &state,
                pipeline.formatters(),
                args.width,
                args.height,
            );
            println!("{plot}");
        }
    }

    // Optional exports.
    if let Some(path) = &args.export {
        crate::io::write_state_json(path, &state)?;
    }
    if let Some(path) = &args.export_long {
        crate::io::write_long_csv(path, &state.long_series)?;
    }

    Ok(())
}

fn build_pipeline(args: &ShowArgs, palette: Palette) -> Result<ChartPipeline, AppError> {
    let pipeline = match select_source(&args.source) {
        Source::File(path) => ChartPipeline::new(FileTransport::new(path), palette),
        Source::Url(url) => ChartPipeline::new(HttpTransport::new(url), palette),
        Source::Sample => {
            let config = SampleConfig {
                rows: args.rows,
                seed: args.seed,
                ..SampleConfig::default()
            };
            let body = generate_sample_csv(&config)?;
            let label = format!("sample (seed={}, rows={})", config.seed, config.rows);
            ChartPipeline::new(MemoryTransport::new(label, body), palette)
        }
        Source::Sheet { id, name } => {
            let name = sheet_name_or_env(name);
            ChartPipeline::new(HttpTransport::google_sheet(&id, &name), palette)
        }
        Source::Env => {
            let transport = HttpTransport::from_env().map_err(crate::error::PipelineError::from)?;
            tracing::debug!(url = %transport.url(), "using sheet from environment");
            ChartPipeline::new(transport, palette)
        }
    };
    Ok(pipeline)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    File(std::path::PathBuf),
    Url(String),
    Sample,
    Sheet { id: String, name: Option<String> },
    Env,
}

/// Precedence: `--file` > `--url` > `--sample` > `--sheet-id` > `SHEET_ID`.
fn select_source(args: &SourceArgs) -> Source {
    if let Some(path) = &args.file {
        return Source::File(path.clone());
    }
    if let Some(url) = &args.url {
        return Source::Url(url.clone());
    }
    if args.sample {
        return Source::Sample;
    }
    if let Some(id) = &args.sheet_id {
        return Source::Sheet {
            id: id.clone(),
            name: args.sheet_name.clone(),
        };
    }
    Source::Env
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let categories = if args.categories.is_empty() {
        DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
    } else {
        args.categories
    };
    let config = SampleConfig {
        categories,
        rows: args.rows,
        start: args.start,
        seed: args.seed,
        volatility: args.volatility,
    };
    let csv = generate_sample_csv(&config)?;

    match &args.out {
        Some(path) => std::fs::write(path, csv)
            .map_err(|e| AppError::new(2, format!("Failed to write sample '{}': {e}", path.display())))?,
        None => print!("{csv}"),
    }
    Ok(())
}

/// Rewrite argv so `vol` defaults to `vol show`.
///
/// Rules:
/// - `vol`                      -> `vol show`
/// - `vol --sample ...`         -> `vol show --sample ...`
/// - `vol --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("show".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "show" | "sample");
    if is_subcommand {
        return argv;
    }

    // A leading flag is a `show` flag, unless it is the global `-v` followed
    // by a subcommand.
    if arg1.starts_with('-') {
        let next_is_subcommand = matches!(
            argv.get(2).map(String::as_str),
            Some("show" | "sample")
        );
        if !(matches!(arg1.as_str(), "-v" | "--verbose") && next_is_subcommand) {
            argv.insert(1, "show".to_string());
        }
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
