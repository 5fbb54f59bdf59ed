//! Encoding and decoding helpers between domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD`, timestamps as RFC 3339 strings and the
//! festive flag as an integer 0/1.

use chrono::{DateTime, NaiveDate, Utc};
use storepulse_core::{WeeklySale, sale::store_number_from_i64};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Flags ───────────────────────────────────────────────────────────────────

pub fn encode_flag(flag: bool) -> i64 { i64::from(flag) }

pub fn decode_flag(value: i64) -> bool { value != 0 }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `best_buy_sales` row.
pub struct RawSale {
  pub store_number: i64,
  pub date:         String,
  pub weekly_sales: f64,
  pub festive_week: i64,
  pub inflation:    f64,
  pub fuel_cost:    f64,
  pub jobless_rate: f64,
}

impl RawSale {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      store_number: row.get(0)?,
      date:         row.get(1)?,
      weekly_sales: row.get(2)?,
      festive_week: row.get(3)?,
      inflation:    row.get(4)?,
      fuel_cost:    row.get(5)?,
      jobless_rate: row.get(6)?,
    })
  }

  pub fn into_sale(self) -> Result<WeeklySale> {
    Ok(WeeklySale {
      store_number: store_number_from_i64(self.store_number)?,
      date:         decode_date(&self.date)?,
      weekly_sales: self.weekly_sales,
      festive_week: decode_flag(self.festive_week),
      inflation:    self.inflation,
      fuel_cost:    self.fuel_cost,
      jobless_rate: self.jobless_rate,
    })
  }
}
