//! Final projection: classify, rank and summarise every store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  metrics::{
    CompanySummary, EconomicImpact, SeasonalPerformance, StoreMetrics,
    economic_impact, seasonal_performance, store_metrics,
  },
  sale::{InflationCategory, WeeklySale},
  stats::round_to,
};

// ─── Classification ──────────────────────────────────────────────────────────

/// Where a store's weekly average sits relative to the company band of one
/// standard deviation around the mean of store averages.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::AsRefStr,
)]
pub enum PerformanceCategory {
  #[serde(rename = "Top Performer")]
  #[strum(serialize = "Top Performer")]
  TopPerformer,
  #[serde(rename = "Average Performer")]
  #[strum(serialize = "Average Performer")]
  AveragePerformer,
  #[serde(rename = "Needs Improvement")]
  #[strum(serialize = "Needs Improvement")]
  NeedsImprovement,
}

impl PerformanceCategory {
  /// Both bounds are strict: a value exactly on a threshold is average.
  pub fn classify(avg_weekly_sales: f64, summary: &CompanySummary) -> Self {
    if avg_weekly_sales > summary.upper_threshold {
      Self::TopPerformer
    } else if avg_weekly_sales < summary.lower_threshold {
      Self::NeedsImprovement
    } else {
      Self::AveragePerformer
    }
  }
}

/// How to report a store whose weeks fall into both inflation buckets.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum InflationPolicy {
  /// One row per store, using the bucket with the most weeks. Equal week
  /// counts resolve to high inflation.
  #[default]
  #[strum(serialize = "dominant")]
  Dominant,
  /// One row per store and bucket; store-level columns repeat.
  #[strum(to_string = "per_bucket", serialize = "per-bucket")]
  PerBucket,
}

// ─── Output ──────────────────────────────────────────────────────────────────

/// One line of the store performance report.
///
/// `None` marks a value that is undefined for the store (for example a
/// volatility with a zero minimum) and serialises as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorePerformance {
  pub store_number:             u32,
  pub performance_category:     PerformanceCategory,
  pub total_sales:              f64,
  pub avg_weekly_sales:         f64,
  pub sales_volatility_pct:     Option<f64>,
  pub festive_sales_lift:       Option<f64>,
  pub inflation_category:       InflationCategory,
  pub fuel_cost_correlation:    Option<f64>,
  pub unemployment_correlation: Option<f64>,
  pub sales_rank:               u32,
  pub pct_of_total_sales:       Option<f64>,
}

/// The analyzer's complete result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
  /// `None` only when there were no sales records at all.
  pub summary: Option<CompanySummary>,
  pub stores:  usize,
  pub policy:  InflationPolicy,
  pub rows:    Vec<StorePerformance>,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// Run every stage over `sales` and project the report.
pub fn analyze(sales: &[WeeklySale], policy: InflationPolicy) -> PerformanceReport {
  let metrics = store_metrics(sales);
  let seasonal = seasonal_performance(sales);
  let impact = economic_impact(sales);

  let summary = CompanySummary::from_metrics(&metrics);
  let rows = match &summary {
    Some(summary) => project(&metrics, &seasonal, &impact, summary, policy),
    None => Vec::new(),
  };

  PerformanceReport { summary, stores: metrics.len(), policy, rows }
}

/// Join the stage outputs per store.
///
/// Rows are ordered by `sales_rank`, then store number, then inflation
/// bucket.
pub fn project(
  metrics:  &[StoreMetrics],
  seasonal: &[SeasonalPerformance],
  impact:   &[EconomicImpact],
  summary:  &CompanySummary,
  policy:   InflationPolicy,
) -> Vec<StorePerformance> {
  let ranks = sales_ranks(metrics);

  let festive_lift: BTreeMap<u32, f64> = seasonal
    .iter()
    .filter(|s| s.festive_week)
    .map(|s| (s.store_number, round_to(s.sales_variation, 2)))
    .collect();

  let mut buckets: BTreeMap<u32, Vec<&EconomicImpact>> = BTreeMap::new();
  for row in impact {
    buckets.entry(row.store_number).or_default().push(row);
  }

  let mut rows = Vec::with_capacity(metrics.len());
  for m in metrics {
    let Some(store_buckets) = buckets.get(&m.store_number) else {
      continue;
    };
    let selected: Vec<&EconomicImpact> = match policy {
      InflationPolicy::Dominant => dominant_bucket(store_buckets).into_iter().collect(),
      InflationPolicy::PerBucket => store_buckets.clone(),
    };

    for bucket in selected {
      rows.push(StorePerformance {
        store_number:             m.store_number,
        performance_category:     PerformanceCategory::classify(m.avg_weekly_sales, summary),
        total_sales:              m.total_sales,
        avg_weekly_sales:         m.avg_weekly_sales,
        sales_volatility_pct:     volatility_pct(m),
        festive_sales_lift:       festive_lift.get(&m.store_number).copied(),
        inflation_category:       bucket.inflation_category,
        fuel_cost_correlation:    bucket.fuel_cost_correlation,
        unemployment_correlation: bucket.unemployment_correlation,
        sales_rank:               ranks.get(&m.store_number).copied().unwrap_or_default(),
        pct_of_total_sales:       pct_of_total(m.total_sales, summary.total_company_sales),
      });
    }
  }

  rows.sort_by(|a, b| {
    a.sales_rank
      .cmp(&b.sales_rank)
      .then(a.store_number.cmp(&b.store_number))
      .then(a.inflation_category.cmp(&b.inflation_category))
  });
  rows
}

/// Rank stores by weekly average, highest first.
///
/// Equal averages share a rank and the following distinct average is ranked
/// one past the number of stores strictly ahead of it (1, 1, 3).
pub fn sales_ranks(metrics: &[StoreMetrics]) -> BTreeMap<u32, u32> {
  let mut order: Vec<&StoreMetrics> = metrics.iter().collect();
  order.sort_by(|a, b| {
    b.avg_weekly_sales
      .total_cmp(&a.avg_weekly_sales)
      .then(a.store_number.cmp(&b.store_number))
  });

  let mut ranks = BTreeMap::new();
  let mut rank = 0;
  let mut previous: Option<f64> = None;
  for (position, m) in (1u32..).zip(order) {
    if previous != Some(m.avg_weekly_sales) {
      rank = position;
      previous = Some(m.avg_weekly_sales);
    }
    ranks.insert(m.store_number, rank);
  }
  ranks
}

fn dominant_bucket<'a>(buckets: &[&'a EconomicImpact]) -> Option<&'a EconomicImpact> {
  buckets.iter().copied().max_by(|a, b| {
    a.weeks
      .cmp(&b.weeks)
      .then(b.inflation_category.cmp(&a.inflation_category))
  })
}

fn volatility_pct(m: &StoreMetrics) -> Option<f64> {
  if m.min_weekly_sales == 0.0 {
    return None;
  }
  let pct = (m.max_weekly_sales - m.min_weekly_sales) / m.min_weekly_sales * 100.0;
  Some(round_to(pct, 2))
}

fn pct_of_total(total_sales: f64, company_total: f64) -> Option<f64> {
  if company_total == 0.0 {
    return None;
  }
  Some(round_to(total_sales * 100.0 / company_total, 2))
}
