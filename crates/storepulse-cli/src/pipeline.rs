//! The two pipeline steps behind the CLI commands.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use storepulse_core::{
  InflationPolicy, PerformanceReport,
  store::{LoadSummary, SalesStore, analyze_store},
};

/// Extract, clean and validate `input`, then replace the sales table with it.
pub async fn load<S: SalesStore>(store: &S, input: &Path) -> anyhow::Result<LoadSummary> {
  tracing::info!(input = %input.display(), "starting data load");

  let path: PathBuf = input.to_path_buf();
  let extraction = tokio::task::spawn_blocking(move || storepulse_etl::read_sales_file(path))
    .await
    .context("extraction task panicked")?
    .with_context(|| format!("failed to load and clean {}", input.display()))?;
  tracing::info!(
    rows_read = extraction.rows_read,
    rows_kept = extraction.sales.len(),
    "loaded rows from input file"
  );

  let report = storepulse_etl::validate(&extraction.sales);
  tracing::info!(
    rows = report.rows,
    stores = report.stores,
    clean = report.is_clean(),
    "data validation passed"
  );

  let summary = store
    .replace_sales(extraction.sales, Some(input.display().to_string()))
    .await
    .context("failed to save data to database")?;
  tracing::info!(rows = summary.rows_loaded, "data load completed");
  Ok(summary)
}

/// Run the analyzer over the current contents of the sales table.
pub async fn analyze<S: SalesStore>(
  store: &S,
  policy: InflationPolicy,
) -> anyhow::Result<PerformanceReport> {
  let report = analyze_store(store, policy)
    .await
    .context("failed to read the sales table")?;

  match &report.summary {
    Some(summary) => tracing::info!(
      stores = report.stores,
      rows = report.rows.len(),
      ?policy,
      company_avg_sales = summary.company_avg_sales,
      sales_stddev = summary.sales_stddev,
      total_company_sales = summary.total_company_sales,
      "store performance computed"
    ),
    None => tracing::warn!("sales table is empty; nothing to analyze"),
  }
  Ok(report)
}
