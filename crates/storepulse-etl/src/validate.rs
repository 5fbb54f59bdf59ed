//! Post-extraction data checks.
//!
//! Structural problems (missing columns, bad store numbers) already fail
//! during extraction. What remains here are soft checks that are reported
//! and logged but never reject the load.

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use storepulse_core::WeeklySale;

/// Findings of [`validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
  pub rows:           usize,
  pub stores:         usize,
  pub negative_sales: usize,
  pub future_dates:   usize,
}

impl ValidationReport {
  pub fn is_clean(&self) -> bool { self.negative_sales == 0 && self.future_dates == 0 }
}

/// Check `sales` against today's local date.
pub fn validate(sales: &[WeeklySale]) -> ValidationReport {
  validate_as_of(sales, Local::now().date_naive())
}

/// Check `sales`, treating any date after `today` as a future date.
pub fn validate_as_of(sales: &[WeeklySale], today: NaiveDate) -> ValidationReport {
  let stores: BTreeSet<u32> = sales.iter().map(|s| s.store_number).collect();
  let report = ValidationReport {
    rows:           sales.len(),
    stores:         stores.len(),
    negative_sales: sales.iter().filter(|s| s.weekly_sales < 0.0).count(),
    future_dates:   sales.iter().filter(|s| s.date > today).count(),
  };

  if report.negative_sales > 0 {
    tracing::warn!(rows = report.negative_sales, "found negative sales values");
  }
  if report.future_dates > 0 {
    tracing::warn!(rows = report.future_dates, "found future dates in the dataset");
  }
  report
}
