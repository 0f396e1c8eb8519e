//! Error types.
//!
//! Library stages return the typed errors below; the binary boundary converts
//! them into an `AppError` carrying the process exit code:
//!
//! - `2`: bad input or configuration (CSV structure, palette, arguments)
//! - `3`: data validation (cells that fail date/number coercion)
//! - `4`: transport (network, file access)

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure to obtain the raw CSV text.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no data source configured: {0}")]
    MissingSource(String),
}

/// Malformed CSV structure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("CSV has no header row")]
    MissingHeader,
    #[error("header column {index} is empty")]
    EmptyHeader { index: usize },
    #[error("duplicate header column `{name}`")]
    DuplicateHeader { name: String },
    #[error("malformed CSV at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// Why a cell failed to coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueErrorKind {
    Missing,
    InvalidDate,
    InvalidNumber,
}

/// A single cell that could not be coerced to its typed value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}, column `{column}`: {} '{raw}'", describe(.kind))]
pub struct ValueError {
    pub line: usize,
    pub column: String,
    pub raw: String,
    pub kind: ValueErrorKind,
}

fn describe(kind: &ValueErrorKind) -> &'static str {
    match kind {
        ValueErrorKind::Missing => "empty value",
        ValueErrorKind::InvalidDate => "invalid date",
        ValueErrorKind::InvalidNumber => "invalid number",
    }
}

/// The palette cannot color the dataset.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("palette is empty")]
    EmptyPalette,
    #[error("{categories} categories exceed the palette size of {palette} colors")]
    PaletteTooSmall { categories: usize, palette: usize },
}

/// A failed pipeline run. Published state is left untouched when this is returned.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{} invalid cell(s): {}", .0.len(), join_value_errors(.0))]
    Values(Vec<ValueError>),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl PipelineError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Transport(_) => 4,
            PipelineError::Parse(_) | PipelineError::Configuration(_) => 2,
            PipelineError::Values(_) => 3,
        }
    }
}

fn join_value_errors(errors: &[ValueError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}
