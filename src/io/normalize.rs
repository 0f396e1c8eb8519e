//! Record normalization: untyped `RawRecord` -> typed `Observation`.
//!
//! Every cell is parsed explicitly. A cell that is empty, not a finite number,
//! or (for `Date`) not a calendar date becomes a `ValueError`; nothing is
//! silently coerced to `0` or `NaN`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::{DATE_COLUMN, Observation, RawRecord};
use crate::error::{ValueError, ValueErrorKind};

/// Plain date layouts accepted in the `Date` column.
///
/// ISO first; the others cover what spreadsheet exports emit for US-locale
/// sheets and for dates typed as text.
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Two-digit-year layouts (`1/15/24`). `%y` maps 00-69 to 20xx and 70-99 to 19xx.
///
/// Tried first: they reject four-digit years, while `%Y` would read `24` as year 24.
const SHORT_YEAR_FORMATS: [&str; 2] = ["%m/%d/%y", "%d-%b-%y"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"];

/// Normalize one record.
///
/// All offending cells of the record are returned, not just the first one.
pub fn normalize(record: &RawRecord) -> Result<Observation, Vec<ValueError>> {
    let mut errors = Vec::new();

    let date = match record.get(DATE_COLUMN) {
        Some(raw) => parse_cell(record.line, DATE_COLUMN, raw, parse_date)
            .map_err(|e| errors.push(e))
            .ok(),
        None => {
            errors.push(ValueError {
                line: record.line,
                column: DATE_COLUMN.to_string(),
                raw: String::new(),
                kind: ValueErrorKind::Missing,
            });
            None
        }
    };

    let mut values = Vec::with_capacity(record.fields.len().saturating_sub(1));
    for (column, raw) in &record.fields {
        if column == DATE_COLUMN {
            continue;
        }
        match parse_cell(record.line, column, raw, parse_number) {
            Ok(v) => values.push((column.clone(), v)),
            Err(e) => errors.push(e),
        }
    }

    match date {
        Some(date) if errors.is_empty() => Ok(Observation { date, values }),
        _ => Err(errors),
    }
}

/// Normalize a batch, collecting every cell error across all records.
pub fn normalize_all(records: &[RawRecord]) -> Result<Vec<Observation>, Vec<ValueError>> {
    let mut observations = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for record in records {
        match normalize(record) {
            Ok(obs) => observations.push(obs),
            Err(mut errs) => errors.append(&mut errs),
        }
    }

    if errors.is_empty() {
        Ok(observations)
    } else {
        Err(errors)
    }
}

fn parse_cell<T>(
    line: usize,
    column: &str,
    raw: &str,
    parse: fn(&str) -> Result<T, ValueErrorKind>,
) -> Result<T, ValueError> {
    let trimmed = raw.trim();
    let result = if trimmed.is_empty() {
        Err(ValueErrorKind::Missing)
    } else {
        parse(trimmed)
    };
    result.map_err(|kind| ValueError {
        line,
        column: column.to_string(),
        raw: raw.to_string(),
        kind,
    })
}

/// Parse a decimal number, ignoring `,` thousands separators.
pub fn parse_number(s: &str) -> Result<f64, ValueErrorKind> {
    let cleaned: String = s.chars().filter(|c| *c != ',').collect();
    let v = cleaned
        .trim()
        .parse::<f64>()
        .map_err(|_| ValueErrorKind::InvalidNumber)?;
    // `str::parse` accepts "NaN" and "inf"; neither is a usable volume.
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ValueErrorKind::InvalidNumber)
    }
}

/// Parse a calendar date from the formats spreadsheet exports produce.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValueErrorKind> {
    if let Some(d) = parse_gviz_date(s) {
        return Ok(d);
    }
    for fmt in SHORT_YEAR_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // `%Y` accepts any digit count; anything but a four-digit year is a typo.
    if !has_four_digit_year(s) {
        return Err(ValueErrorKind::InvalidDate);
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    Err(ValueErrorKind::InvalidDate)
}

/// The longest run of digits is the year in every accepted `%Y` layout.
fn has_four_digit_year(s: &str) -> bool {
    s.split(|c: char| !c.is_ascii_digit()).map(str::len).max() == Some(4)
}

/// Google Sheets literal `Date(2024,0,15)`; the month is zero-based.
fn parse_gviz_date(s: &str) -> Option<NaiveDate> {
    let inner = s.strip_prefix("Date(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<i64>());
    let year = i32::try_from(parts.next()?.ok()?).ok()?;
    let month0 = u32::try_from(parts.next()?.ok()?).ok()?;
    let day = u32::try_from(parts.next()?.ok()?).ok()?;
    NaiveDate::from_ymd_opt(year, month0 + 1, day)
}
