//! Weekly sales records — the single input entity of the analyzer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Weeks with an inflation rate strictly above this value are bucketed as
/// [`InflationCategory::High`]; a rate of exactly 2.5 is still normal.
pub const HIGH_INFLATION_THRESHOLD: f64 = 2.5;

/// One store's trading figures for one calendar week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySale {
  pub store_number: u32,
  pub date:         NaiveDate,
  /// Total revenue for the store-week. Expected non-negative; the loader
  /// warns about violations, the analyzer never checks.
  pub weekly_sales: f64,
  /// Whether the week contains a holiday or promotional period.
  pub festive_week: bool,
  /// Inflation rate for the week, in percent.
  pub inflation:    f64,
  pub fuel_cost:    f64,
  /// Unemployment rate for the week, in percent.
  pub jobless_rate: f64,
}

impl WeeklySale {
  pub fn inflation_category(&self) -> InflationCategory {
    InflationCategory::of(self.inflation)
  }
}

/// Convert a raw integer identifier into a store number.
///
/// Store numbers are positive; zero, negatives and values beyond `u32` are
/// rejected.
pub fn store_number_from_i64(raw: i64) -> Result<u32> {
  u32::try_from(raw)
    .ok()
    .filter(|n| *n > 0)
    .ok_or(Error::InvalidStoreNumber(raw))
}

/// Inflation bucket used to segment a store's weeks.
///
/// Variants are declared in output order: high-inflation rows sort first.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::AsRefStr,
  strum::EnumString,
)]
pub enum InflationCategory {
  #[serde(rename = "High Inflation")]
  #[strum(serialize = "High Inflation")]
  High,
  #[serde(rename = "Normal Inflation")]
  #[strum(serialize = "Normal Inflation")]
  Normal,
}

impl InflationCategory {
  pub fn of(inflation: f64) -> Self {
    if inflation > HIGH_INFLATION_THRESHOLD {
      Self::High
    } else {
      Self::Normal
    }
  }
}
