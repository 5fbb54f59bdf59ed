//! The `SalesStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g.
//! `storepulse-store-sqlite`). The loader and the CLI depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  performance::{InflationPolicy, PerformanceReport, analyze},
  sale::WeeklySale,
};

/// Outcome of [`SalesStore::replace_sales`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
  /// Row count read back from the table after the load committed.
  pub rows_loaded: u64,
  pub loaded_at:   DateTime<Utc>,
  pub source_file: Option<String>,
}

/// Abstraction over the relational table holding weekly sales.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait SalesStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Replace the whole sales table with `sales`, atomically.
  ///
  /// Every row is stamped with the load time and `source_file`.
  fn replace_sales(
    &self,
    sales: Vec<WeeklySale>,
    source_file: Option<String>,
  ) -> impl Future<Output = Result<LoadSummary, Self::Error>> + Send + '_;

  /// Whether the sales table exists at all.
  fn has_sales_table(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn count_sales(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Read every weekly record. Fails if the table or one of its expected
  /// columns is absent.
  fn weekly_sales(
    &self,
  ) -> impl Future<Output = Result<Vec<WeeklySale>, Self::Error>> + Send + '_;
}

/// Read the current table contents and run the analyzer over them.
pub async fn analyze_store<S: SalesStore>(
  store: &S,
  policy: InflationPolicy,
) -> Result<PerformanceReport, S::Error> {
  let sales = store.weekly_sales().await?;
  Ok(analyze(&sales, policy))
}
