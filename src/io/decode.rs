//! CSV decoding.
//!
//! Turns raw delimited text with a header row into untyped `RawRecord`s. No
//! type coercion happens here; see `normalize` for that.
//!
//! Rules:
//! - the first non-empty line is the header; names are trimmed and a UTF-8 BOM
//!   is stripped from the first one
//! - empty lines are skipped
//! - every record must have exactly as many fields as the header
//! - quoted fields must be closed

use std::collections::HashSet;

use csv::StringRecord;

use crate::domain::{DATE_COLUMN, RawRecord};
use crate::error::ParseError;

/// Decoded header plus records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTable {
    pub header: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl DecodedTable {
    /// Category columns in header order (everything except `Date`).
    pub fn categories(&self) -> Vec<String> {
        match self.records.first() {
            Some(first) => first.categories().map(str::to_string).collect(),
            None => self
                .header
                .iter()
                .filter(|name| name.as_str() != DATE_COLUMN)
                .cloned()
                .collect(),
        }
    }
}

/// Decode CSV text into records.
pub fn decode(raw: &str) -> Result<Vec<RawRecord>, ParseError> {
    decode_table(raw).map(|table| table.records)
}

/// Decode CSV text, keeping the header alongside the records.
pub fn decode_table(raw: &str) -> Result<DecodedTable, ParseError> {
    check_quotes(raw)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| malformed(&e, 1))?
        .clone();
    let header = validate_header(&headers)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Fallback only; the reader position accounts for skipped empty lines.
        let fallback_line = idx + 2;
        let record = result.map_err(|e| malformed(&e, fallback_line))?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(fallback_line);

        let fields = header
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        records.push(RawRecord { line, fields });
    }

    Ok(DecodedTable { header, records })
}

fn validate_header(headers: &StringRecord) -> Result<Vec<String>, ParseError> {
    if headers.is_empty() {
        return Err(ParseError::MissingHeader);
    }

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(headers.len());
    for (index, name) in headers.iter().enumerate() {
        // Spreadsheet exports sometimes prefix the first header with a BOM.
        let name = name.trim().trim_start_matches('\u{feff}').to_string();
        if name.is_empty() {
            return Err(ParseError::EmptyHeader { index });
        }
        if !seen.insert(name.clone()) {
            return Err(ParseError::DuplicateHeader { name });
        }
        out.push(name);
    }
    Ok(out)
}

/// Reject text with an unterminated quoted field.
///
/// Mirrors the reader: a quote opens a quoted section only at the start of a
/// field. Elsewhere it is literal text (`5"`, `12" Pipe`).
fn check_quotes(raw: &str) -> Result<(), ParseError> {
    #[derive(Clone, Copy)]
    enum State {
        FieldStart,
        Unquoted,
        Quoted,
        QuoteInQuoted,
    }

    let mut line = 1usize;
    let mut opened_at = 0usize;
    let mut state = State::FieldStart;

    for ch in raw.chars() {
        state = match (state, ch) {
            (State::Quoted, '"') => State::QuoteInQuoted,
            (State::Quoted, c) => {
                if c == '\n' {
                    line += 1;
                }
                State::Quoted
            }
            // `""` is an escaped quote.
            (State::QuoteInQuoted, '"') => State::Quoted,
            (State::FieldStart, '"') => {
                opened_at = line;
                State::Quoted
            }
            (_, ',') => State::FieldStart,
            (_, '\n') => {
                line += 1;
                State::FieldStart
            }
            _ => State::Unquoted,
        };
    }

    if matches!(state, State::Quoted) {
        return Err(ParseError::Malformed {
            line: opened_at,
            message: "unterminated quoted field".to_string(),
        });
    }
    Ok(())
}

fn malformed(err: &csv::Error, fallback_line: usize) -> ParseError {
    let line = err
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(fallback_line);
    let message = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        _ => err.to_string(),
    };
    ParseError::Malformed { line, message }
}
