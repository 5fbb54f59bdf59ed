//! [`SqliteStore`] — the SQLite implementation of [`SalesStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use storepulse_core::{
  WeeklySale,
  store::{LoadSummary, SalesStore},
};

use crate::{
  Error, Result,
  encode::{RawSale, encode_date, encode_dt, encode_flag},
  schema::{
    CONNECTION_PRAGMAS, COUNT_SALES, INSERT_CHUNK, INSERT_SALE, RECREATE_SALES_TABLE,
    SALES_TABLE, SELECT_SALES, TABLE_EXISTS,
  },
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A weekly sales table backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a database at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_connection().await?;
    Ok(store)
  }

  /// Open an in-memory database — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_connection().await?;
    Ok(store)
  }

  async fn init_connection(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn require_sales_table(&self) -> Result<()> {
    if self.has_sales_table().await? {
      Ok(())
    } else {
      Err(Error::MissingTable(SALES_TABLE))
    }
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

// ─── SalesStore impl ─────────────────────────────────────────────────────────

impl SalesStore for SqliteStore {
  type Error = Error;

  async fn replace_sales(
    &self,
    sales:       Vec<WeeklySale>,
    source_file: Option<String>,
  ) -> Result<LoadSummary> {
    let loaded_at = Utc::now();
    let loaded_at_str = encode_dt(loaded_at);
    let source = source_file.clone();
    let total = sales.len();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(RECREATE_SALES_TABLE)?;
        {
          let mut stmt = tx.prepare(INSERT_SALE)?;
          for (index, chunk) in sales.chunks(INSERT_CHUNK).enumerate() {
            for sale in chunk {
              stmt.execute(rusqlite::params![
                sale.store_number,
                encode_date(sale.date),
                sale.weekly_sales,
                encode_flag(sale.festive_week),
                sale.inflation,
                sale.fuel_cost,
                sale.jobless_rate,
                loaded_at_str,
                source,
              ])?;
            }
            tracing::debug!(
              chunk = index + 1,
              rows = (index * INSERT_CHUNK + chunk.len()),
              total,
              "inserted sales chunk"
            );
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    if !self.has_sales_table().await? {
      return Err(Error::TableNotCreated(SALES_TABLE));
    }
    let rows_loaded = self.count_sales().await?;
    tracing::info!(rows = rows_loaded, table = SALES_TABLE, "loaded sales rows");

    Ok(LoadSummary { rows_loaded, loaded_at, source_file })
  }

  async fn has_sales_table(&self) -> Result<bool> {
    let exists = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(TABLE_EXISTS, rusqlite::params![SALES_TABLE], |_| Ok(true))
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn count_sales(&self) -> Result<u64> {
    self.require_sales_table().await?;
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row(COUNT_SALES, [], |row| row.get(0))?))
      .await?;
    Ok(u64::try_from(count).unwrap_or_default())
  }

  async fn weekly_sales(&self) -> Result<Vec<WeeklySale>> {
    self.require_sales_table().await?;

    let raws: Vec<RawSale> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(SELECT_SALES)?;
        let rows = stmt
          .query_map([], RawSale::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSale::into_sale).collect()
  }
}
