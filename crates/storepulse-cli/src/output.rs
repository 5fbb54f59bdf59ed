//! Rendering of the performance report for the terminal.

use clap::ValueEnum;
use storepulse_core::{PerformanceReport, StorePerformance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
  /// Aligned text columns; undefined values print as NULL.
  Table,
  /// The whole report as one JSON object (`summary`, `stores`, `policy`,
  /// `rows`); undefined values are null.
  Json,
}

pub fn render(report: &PerformanceReport, format: OutputFormat) -> anyhow::Result<String> {
  match format {
    OutputFormat::Table => {
      let mut out = render_table(&report.rows);
      out.push_str(&render_summary(report));
      Ok(out)
    }
    OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
  }
}

/// The company baseline printed under the table.
fn render_summary(report: &PerformanceReport) -> String {
  let Some(summary) = &report.summary else {
    return "\nno sales records\n".to_string();
  };
  let lines = [
    ("stores", report.stores.to_string()),
    ("inflation_policy", report.policy.to_string()),
    ("company_avg_sales", format!("{:.2}", summary.company_avg_sales)),
    ("sales_stddev", format!("{:.2}", summary.sales_stddev)),
    ("upper_threshold", format!("{:.2}", summary.upper_threshold)),
    ("lower_threshold", format!("{:.2}", summary.lower_threshold)),
    ("total_company_sales", format!("{:.2}", summary.total_company_sales)),
  ];
  let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or_default();

  let mut out = String::from("\n");
  for (label, value) in lines {
    out.push_str(&format!("{label:<width$}  {value}\n"));
  }
  out
}

// ─── Table ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Align {
  Left,
  Right,
}

const COLUMNS: [(&str, Align); 11] = [
  ("store_number", Align::Right),
  ("performance_category", Align::Left),
  ("total_sales", Align::Right),
  ("avg_weekly_sales", Align::Right),
  ("sales_volatility_pct", Align::Right),
  ("festive_sales_lift", Align::Right),
  ("inflation_category", Align::Left),
  ("fuel_cost_correlation", Align::Right),
  ("unemployment_correlation", Align::Right),
  ("sales_rank", Align::Right),
  ("pct_of_total_sales", Align::Right),
];

fn optional(value: Option<f64>, places: usize) -> String {
  value.map_or_else(|| "NULL".to_string(), |v| format!("{v:.places$}"))
}

fn cells(row: &StorePerformance) -> [String; 11] {
  [
    row.store_number.to_string(),
    row.performance_category.to_string(),
    format!("{:.2}", row.total_sales),
    format!("{:.2}", row.avg_weekly_sales),
    optional(row.sales_volatility_pct, 2),
    optional(row.festive_sales_lift, 2),
    row.inflation_category.to_string(),
    optional(row.fuel_cost_correlation, 3),
    optional(row.unemployment_correlation, 3),
    row.sales_rank.to_string(),
    optional(row.pct_of_total_sales, 2),
  ]
}

pub fn render_table(rows: &[StorePerformance]) -> String {
  let body: Vec<[String; 11]> = rows.iter().map(cells).collect();

  let mut widths = COLUMNS.map(|(header, _)| header.len());
  for line in &body {
    for (width, cell) in widths.iter_mut().zip(line) {
      *width = (*width).max(cell.len());
    }
  }

  let format_line = |values: &[String]| -> String {
    values
      .iter()
      .zip(COLUMNS.iter().zip(widths))
      .map(|(value, ((_, align), width))| match align {
        Align::Left => format!("{value:<width$}"),
        Align::Right => format!("{value:>width$}"),
      })
      .collect::<Vec<_>>()
      .join("  ")
      .trim_end()
      .to_string()
  };

  let headers: Vec<String> = COLUMNS.iter().map(|(h, _)| h.to_string()).collect();
  let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

  let mut out = String::new();
  out.push_str(&format_line(&headers[..]));
  out.push('\n');
  out.push_str(&rule.join("  "));
  out.push('\n');
  for line in &body {
    out.push_str(&format_line(&line[..]));
    out.push('\n');
  }
  out
}
