//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use storepulse_core::{
  InflationCategory, InflationPolicy, WeeklySale,
  store::{SalesStore, analyze_store},
};

use crate::{Error, SALES_TABLE, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn sale(store_number: u32, day: u32, weekly_sales: f64, festive_week: bool) -> WeeklySale {
  WeeklySale {
    store_number,
    date: NaiveDate::from_ymd_opt(2011, 3, day).unwrap(),
    weekly_sales,
    festive_week,
    inflation: 2.1 + f64::from(day) / 100.0,
    fuel_cost: 3.2 + f64::from(day) / 50.0,
    jobless_rate: 7.8 - f64::from(day) / 100.0,
  }
}

fn sample() -> Vec<WeeklySale> {
  vec![
    sale(2, 4, 900.0, false),
    sale(1, 11, 120.0, false),
    sale(1, 4, 100.0, true),
    sale(2, 11, 1100.0, false),
    sale(1, 18, 140.0, false),
  ]
}

// ─── Table lifecycle ─────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_database_has_no_sales_table() {
  let s = store().await;
  assert!(!s.has_sales_table().await.unwrap());

  let err = s.weekly_sales().await.unwrap_err();
  assert!(matches!(err, Error::MissingTable(SALES_TABLE)));

  let err = s.count_sales().await.unwrap_err();
  assert!(matches!(err, Error::MissingTable(_)));
}

#[tokio::test]
async fn analyze_before_load_is_fatal() {
  let s = store().await;
  let result = analyze_store(&s, InflationPolicy::Dominant).await;
  assert!(matches!(result, Err(Error::MissingTable(_))));
}

#[tokio::test]
async fn replace_and_read_back() {
  let s = store().await;
  let summary = s
    .replace_sales(sample(), Some("data/sales.csv".into()))
    .await
    .unwrap();
  assert_eq!(summary.rows_loaded, 5);
  assert_eq!(summary.source_file.as_deref(), Some("data/sales.csv"));
  assert!(s.has_sales_table().await.unwrap());
  assert_eq!(s.count_sales().await.unwrap(), 5);

  let rows = s.weekly_sales().await.unwrap();
  assert_eq!(rows.len(), 5);

  // Ordered by store, then date.
  let keys: Vec<(u32, u32)> = rows
    .iter()
    .map(|r| (r.store_number, chrono::Datelike::day(&r.date)))
    .collect();
  assert_eq!(keys, vec![(1, 4), (1, 11), (1, 18), (2, 4), (2, 11)]);

  let first = &rows[0];
  assert_eq!(*first, sale(1, 4, 100.0, true));
}

#[tokio::test]
async fn replace_discards_previous_load() {
  let s = store().await;
  s.replace_sales(sample(), None).await.unwrap();
  s.replace_sales(vec![sale(7, 1, 50.0, false)], None).await.unwrap();

  let rows = s.weekly_sales().await.unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(rows[0].store_number, 7);
}

#[tokio::test]
async fn replace_with_nothing_leaves_empty_table() {
  let s = store().await;
  let summary = s.replace_sales(Vec::new(), None).await.unwrap();
  assert_eq!(summary.rows_loaded, 0);
  assert!(s.has_sales_table().await.unwrap());
  assert!(s.weekly_sales().await.unwrap().is_empty());

  let report = analyze_store(&s, InflationPolicy::Dominant).await.unwrap();
  assert!(report.rows.is_empty());
}

#[tokio::test]
async fn load_spans_many_chunks() {
  let s = store().await;
  let sales: Vec<WeeklySale> = (0..2_500u32)
    .map(|i| sale(1 + i % 45, 1 + i % 28, 1_000.0 + f64::from(i), i % 13 == 0))
    .collect();
  let summary = s.replace_sales(sales, None).await.unwrap();
  assert_eq!(summary.rows_loaded, 2_500);
}

#[tokio::test]
async fn lineage_columns_are_stamped() {
  let s = store().await;
  let summary = s
    .replace_sales(sample(), Some("weekly.csv".into()))
    .await
    .unwrap();

  let stamps: Vec<(String, Option<String>)> = s
    .connection()
    .call(|conn| {
      let mut stmt =
        conn.prepare("SELECT DISTINCT loaded_at, source_file FROM best_buy_sales")?;
      let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
      Ok(rows)
    })
    .await
    .unwrap();

  assert_eq!(stamps.len(), 1);
  assert_eq!(stamps[0].0, summary.loaded_at.to_rfc3339());
  assert_eq!(stamps[0].1.as_deref(), Some("weekly.csv"));
}

// ─── Schema errors ───────────────────────────────────────────────────────────

#[tokio::test]
async fn table_missing_a_column_is_a_database_error() {
  let s = store().await;
  s.connection()
    .call(|conn| {
      conn.execute_batch(
        "CREATE TABLE best_buy_sales (
           store_number INTEGER, date TEXT, weekly_sales REAL
         );",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.weekly_sales().await.unwrap_err();
  assert!(matches!(err, Error::Database(_)), "got {err:?}");
}

#[tokio::test]
async fn non_positive_store_number_in_table_is_rejected() {
  let s = store().await;
  s.connection()
    .call(|conn| {
      conn.execute_batch(
        "CREATE TABLE best_buy_sales (
           store_number INTEGER, date TEXT, weekly_sales REAL, festive_week INTEGER,
           inflation REAL, fuel_cost REAL, jobless_rate REAL
         );
         INSERT INTO best_buy_sales VALUES (0, '2011-03-04', 10.0, 0, 2.0, 3.0, 7.0);",
      )?;
      Ok(())
    })
    .await
    .unwrap();

  let err = s.weekly_sales().await.unwrap_err();
  assert!(matches!(err, Error::Core(_)), "got {err:?}");
}

// ─── End to end ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn analyze_loaded_table() {
  let s = store().await;
  s.replace_sales(sample(), None).await.unwrap();

  let report = analyze_store(&s, InflationPolicy::Dominant).await.unwrap();
  assert_eq!(report.stores, 2);
  assert_eq!(report.rows.len(), 2);

  let top = &report.rows[0];
  assert_eq!(top.store_number, 2);
  assert_eq!(top.sales_rank, 1);
  assert_eq!(top.avg_weekly_sales, 1000.0);
  assert_eq!(top.festive_sales_lift, None);
  assert_eq!(top.inflation_category, InflationCategory::Normal);

  let second = &report.rows[1];
  assert_eq!(second.store_number, 1);
  assert_eq!(second.sales_rank, 2);
  assert_eq!(second.avg_weekly_sales, 120.0);
  assert_eq!(second.festive_sales_lift, Some(-20.0));
  assert_eq!(second.sales_volatility_pct, Some(40.0));

  let again = analyze_store(&s, InflationPolicy::Dominant).await.unwrap();
  assert_eq!(report, again);
}
