//! Per-store aggregation stages.
//!
//! Each stage is a pure function over the full set of weekly records. Groups
//! are collected into ordered maps so output order depends only on the keys,
//! never on input order.
//!
//! ```text
//! store_metrics ──────────────┐
//! seasonal_performance ───────┤
//! economic_impact ────────────┼─▶ performance::project
//! CompanySummary (from 1st) ──┘
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
  sale::{InflationCategory, WeeklySale},
  stats::{CoMoments, mean, population_stddev, round_to},
};

// ─── Store metrics ───────────────────────────────────────────────────────────

/// Basic weekly-sales statistics for one store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreMetrics {
  pub store_number:     u32,
  pub weeks_counted:    u64,
  pub total_sales:      f64,
  pub avg_weekly_sales: f64,
  pub min_weekly_sales: f64,
  pub max_weekly_sales: f64,
}

#[derive(Default)]
struct SalesTally {
  weeks: u64,
  total: f64,
  min:   f64,
  max:   f64,
}

impl SalesTally {
  fn push(&mut self, value: f64) {
    if self.weeks == 0 {
      self.min = value;
      self.max = value;
    } else {
      self.min = self.min.min(value);
      self.max = self.max.max(value);
    }
    self.weeks += 1;
    self.total += value;
  }

  fn avg(&self) -> f64 { self.total / self.weeks as f64 }
}

/// One row per store, ordered by store number. Empty input gives no rows.
pub fn store_metrics(sales: &[WeeklySale]) -> Vec<StoreMetrics> {
  let mut tallies: BTreeMap<u32, SalesTally> = BTreeMap::new();
  for sale in sales {
    tallies.entry(sale.store_number).or_default().push(sale.weekly_sales);
  }

  tallies
    .into_iter()
    .map(|(store_number, t)| StoreMetrics {
      store_number,
      weeks_counted: t.weeks,
      total_sales: t.total,
      avg_weekly_sales: t.avg(),
      min_weekly_sales: t.min,
      max_weekly_sales: t.max,
    })
    .collect()
}

// ─── Seasonal performance ────────────────────────────────────────────────────

/// Average sales of one store over its festive or its regular weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalPerformance {
  pub store_number:    u32,
  pub festive_week:    bool,
  pub avg_sales:       f64,
  /// Segment average minus the store's overall weekly average.
  pub sales_variation: f64,
}

/// One row per (store, festive flag) pair that actually occurs.
///
/// A store without festive weeks has no `festive_week = true` row.
pub fn seasonal_performance(sales: &[WeeklySale]) -> Vec<SeasonalPerformance> {
  let mut overall: BTreeMap<u32, SalesTally> = BTreeMap::new();
  let mut segments: BTreeMap<(u32, bool), SalesTally> = BTreeMap::new();
  for sale in sales {
    overall.entry(sale.store_number).or_default().push(sale.weekly_sales);
    segments
      .entry((sale.store_number, sale.festive_week))
      .or_default()
      .push(sale.weekly_sales);
  }

  segments
    .into_iter()
    .filter_map(|((store_number, festive_week), segment)| {
      let store_avg = overall.get(&store_number)?.avg();
      let avg_sales = segment.avg();
      Some(SeasonalPerformance {
        store_number,
        festive_week,
        avg_sales,
        sales_variation: avg_sales - store_avg,
      })
    })
    .collect()
}

// ─── Economic impact ─────────────────────────────────────────────────────────

/// Sales behaviour of one store within one inflation bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicImpact {
  pub store_number:             u32,
  pub inflation_category:       InflationCategory,
  pub weeks:                    u64,
  pub avg_sales:                f64,
  /// Correlation of weekly sales with fuel cost, rounded to 3 places.
  pub fuel_cost_correlation:    Option<f64>,
  /// Correlation of weekly sales with the jobless rate, rounded to 3 places.
  pub unemployment_correlation: Option<f64>,
}

#[derive(Default)]
struct ImpactTally {
  total:        f64,
  fuel:         CoMoments,
  unemployment: CoMoments,
}

/// One row per (store, inflation bucket) pair that actually occurs, ordered
/// by store and then bucket.
pub fn economic_impact(sales: &[WeeklySale]) -> Vec<EconomicImpact> {
  let mut groups: BTreeMap<(u32, InflationCategory), ImpactTally> = BTreeMap::new();
  for sale in sales {
    let tally = groups
      .entry((sale.store_number, sale.inflation_category()))
      .or_default();
    tally.total += sale.weekly_sales;
    tally.fuel.push(sale.weekly_sales, sale.fuel_cost);
    tally.unemployment.push(sale.weekly_sales, sale.jobless_rate);
  }

  groups
    .into_iter()
    .map(|((store_number, inflation_category), t)| EconomicImpact {
      store_number,
      inflation_category,
      weeks: t.fuel.n,
      avg_sales: t.total / t.fuel.n as f64,
      fuel_cost_correlation: t.fuel.pearson().map(|r| round_to(r, 3)),
      unemployment_correlation: t.unemployment.pearson().map(|r| round_to(r, 3)),
    })
    .collect()
}

// ─── Company summary ─────────────────────────────────────────────────────────

/// Company-wide baseline every store is compared against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanySummary {
  /// Mean of the per-store weekly averages; stores are weighted equally
  /// regardless of how many weeks they report.
  pub company_avg_sales:   f64,
  /// Population standard deviation of the per-store weekly averages.
  pub sales_stddev:        f64,
  pub upper_threshold:     f64,
  pub lower_threshold:     f64,
  pub total_company_sales: f64,
}

impl CompanySummary {
  /// `None` when there are no stores.
  pub fn from_metrics(metrics: &[StoreMetrics]) -> Option<Self> {
    let averages: Vec<f64> = metrics.iter().map(|m| m.avg_weekly_sales).collect();
    let company_avg_sales = mean(&averages)?;
    let sales_stddev = population_stddev(&averages)?;

    Some(Self {
      company_avg_sales,
      sales_stddev,
      upper_threshold: company_avg_sales + sales_stddev,
      lower_threshold: company_avg_sales - sales_stddev,
      total_company_sales: metrics.iter().map(|m| m.total_sales).sum(),
    })
  }
}
