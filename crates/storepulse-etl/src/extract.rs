//! CSV extraction and cleaning.
//!
//! Pipeline:
//!   raw CSV
//!     └─ normalize_header()  → column lookup
//!          └─ parse_date()       → drop rows without a usable date
//!               └─ parse_number() / parse_flag() → WeeklySale

use std::{fs::File, io::Read, path::Path};

use chrono::NaiveDate;
use csv::StringRecord;
use storepulse_core::{WeeklySale, sale::store_number_from_i64};

use crate::error::{Error, Result};

/// Columns without which a row cannot be loaded.
pub const REQUIRED_COLUMNS: [&str; 3] = ["store_number", "date", "weekly_sales"];

/// Analyzer inputs that default to zero when the export lacks them.
pub const OPTIONAL_COLUMNS: [&str; 4] =
  ["festive_week", "inflation", "fuel_cost", "jobless_rate"];

/// Format used by the retail export.
const PRIMARY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Day-first formats tried when the primary one fails.
const FALLBACK_DATE_FORMATS: [&str; 5] =
  ["%d/%m/%Y", "%d-%m-%y", "%d/%m/%y", "%Y-%m-%d", "%d.%m.%Y"];

/// Spellings of a missing numeric cell; cleaned to zero.
const MISSING_MARKERS: [&str; 5] = ["", "na", "n/a", "nan", "null"];

// ─── Public types ────────────────────────────────────────────────────────────

/// The cleaned contents of one CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
  pub sales:           Vec<WeeklySale>,
  /// Data rows in the file, including dropped ones.
  pub rows_read:       usize,
  /// Rows dropped because no date format matched.
  pub dropped_dates:   usize,
  /// Rows whose date only parsed with a fallback format.
  pub fallback_dates:  usize,
  /// Normalised header names that are not loaded.
  pub ignored_columns: Vec<String>,
}

// ─── Column mapping ──────────────────────────────────────────────────────────

/// Lower-case a header and replace spaces with underscores
/// (`"Weekly Sales"` → `"weekly_sales"`).
pub fn normalize_header(raw: &str) -> String {
  raw.trim().to_lowercase().replace(' ', "_")
}

struct Columns {
  store_number: usize,
  date:         usize,
  weekly_sales: usize,
  festive_week: Option<usize>,
  inflation:    Option<usize>,
  fuel_cost:    Option<usize>,
  jobless_rate: Option<usize>,
}

impl Columns {
  fn resolve(headers: &[String]) -> Result<Self> {
    let find = |name: &str| headers.iter().position(|h| h == name);

    let [store_number, date, weekly_sales] = REQUIRED_COLUMNS.map(find);
    let (Some(store_number), Some(date), Some(weekly_sales)) = (store_number, date, weekly_sales)
    else {
      let missing = REQUIRED_COLUMNS
        .iter()
        .filter(|c| find(**c).is_none())
        .map(|c| c.to_string())
        .collect();
      return Err(Error::MissingColumns(missing));
    };

    for name in OPTIONAL_COLUMNS {
      if find(name).is_none() {
        tracing::warn!(column = name, "column absent; filling with 0");
      }
    }

    Ok(Self {
      store_number,
      date,
      weekly_sales,
      festive_week: find("festive_week"),
      inflation:    find("inflation"),
      fuel_cost:    find("fuel_cost"),
      jobless_rate: find("jobless_rate"),
    })
  }
}

// ─── Cell parsers ────────────────────────────────────────────────────────────

/// Parse a day-first date. Returns the date and whether a fallback format
/// was needed.
pub fn parse_date(raw: &str) -> Option<(NaiveDate, bool)> {
  let raw = raw.trim();
  if let Ok(date) = NaiveDate::parse_from_str(raw, PRIMARY_DATE_FORMAT) {
    return Some((date, false));
  }
  FALLBACK_DATE_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    .map(|date| (date, true))
}

fn is_missing(raw: &str) -> bool {
  let lowered = raw.trim().to_ascii_lowercase();
  MISSING_MARKERS.contains(&lowered.as_str())
}

/// Parse a numeric cell; missing markers become `0.0`.
fn parse_number(raw: &str, line: u64, column: &'static str) -> Result<f64> {
  if is_missing(raw) {
    return Ok(0.0);
  }
  raw
    .trim()
    .parse::<f64>()
    .ok()
    .filter(|v| v.is_finite())
    .ok_or_else(|| Error::InvalidNumber { line, column, value: raw.to_owned() })
}

/// Parse a 0/1 style flag; missing markers are `false`.
fn parse_flag(raw: &str, line: u64, column: &'static str) -> Result<bool> {
  if is_missing(raw) {
    return Ok(false);
  }
  match raw.trim().to_ascii_lowercase().as_str() {
    "true" | "yes" | "y" => Ok(true),
    "false" | "no" | "n" => Ok(false),
    other => other
      .parse::<f64>()
      .map(|v| v != 0.0)
      .map_err(|_| Error::InvalidFlag { line, column, value: raw.to_owned() }),
  }
}

/// Store numbers must be positive integers; a missing cell counts as zero.
fn parse_store_number(raw: &str, line: u64) -> Result<u32> {
  let value = if is_missing(raw) {
    0
  } else {
    raw.trim().parse::<i64>().map_err(|_| Error::NonIntegerStoreNumber {
      line,
      value: raw.to_owned(),
    })?
  };
  store_number_from_i64(value).map_err(|_| Error::NonPositiveStoreNumber { line, value })
}

fn cell<'r>(record: &'r StringRecord, index: Option<usize>) -> &'r str {
  index.and_then(|i| record.get(i)).unwrap_or("")
}

// ─── Extraction ──────────────────────────────────────────────────────────────

/// Read and clean a sales export from any reader.
pub fn read_sales<R: Read>(reader: R) -> Result<Extraction> {
  let mut csv_reader = csv::ReaderBuilder::new()
    .has_headers(true)
    .trim(csv::Trim::All)
    .from_reader(reader);

  let headers: Vec<String> = csv_reader.headers()?.iter().map(normalize_header).collect();
  let columns = Columns::resolve(&headers)?;

  let known: Vec<&str> = REQUIRED_COLUMNS.iter().chain(OPTIONAL_COLUMNS.iter()).copied().collect();
  let ignored_columns: Vec<String> = headers
    .iter()
    .filter(|h| !known.contains(&h.as_str()))
    .cloned()
    .collect();
  if !ignored_columns.is_empty() {
    tracing::debug!(?ignored_columns, "ignoring columns the analyzer does not use");
  }

  let mut sales = Vec::new();
  let mut rows_read = 0;
  let mut dropped_dates = 0;
  let mut fallback_dates = 0;

  for result in csv_reader.records() {
    let record = result?;
    rows_read += 1;
    let line = record.position().map(|p| p.line()).unwrap_or_default();

    let Some((date, fallback)) = parse_date(cell(&record, Some(columns.date))) else {
      dropped_dates += 1;
      continue;
    };
    if fallback {
      fallback_dates += 1;
    }

    sales.push(WeeklySale {
      store_number: parse_store_number(cell(&record, Some(columns.store_number)), line)?,
      date,
      weekly_sales: parse_number(cell(&record, Some(columns.weekly_sales)), line, "weekly_sales")?,
      festive_week: parse_flag(cell(&record, columns.festive_week), line, "festive_week")?,
      inflation:    parse_number(cell(&record, columns.inflation), line, "inflation")?,
      fuel_cost:    parse_number(cell(&record, columns.fuel_cost), line, "fuel_cost")?,
      jobless_rate: parse_number(cell(&record, columns.jobless_rate), line, "jobless_rate")?,
    });
  }

  if fallback_dates > 0 {
    tracing::warn!(rows = fallback_dates, "date format does not match; parsed with fallback formats");
  }
  if dropped_dates > 0 {
    tracing::warn!(rows = dropped_dates, "removing rows with invalid dates");
  }

  Ok(Extraction { sales, rows_read, dropped_dates, fallback_dates, ignored_columns })
}

/// Read and clean a sales export from a file on disk.
pub fn read_sales_file(path: impl AsRef<Path>) -> Result<Extraction> {
  let path = path.as_ref();
  let file = File::open(path).map_err(|source| Error::Open {
    path: path.display().to_string(),
    source,
  })?;
  read_sales(file)
}
