//! SQL for the StorePulse SQLite store.
//!
//! The sales table is owned by the loader: every load drops and recreates
//! it. Opening a connection only sets pragmas, so a database that was never
//! loaded has no sales table at all.

/// Name of the weekly sales table.
pub const SALES_TABLE: &str = "best_buy_sales";

/// Rows inserted per logged batch during a load.
pub const INSERT_CHUNK: usize = 1000;

/// Executed once per connection.
pub const CONNECTION_PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
";

/// Replace semantics: any previous load is discarded.
pub const RECREATE_SALES_TABLE: &str = "
DROP TABLE IF EXISTS best_buy_sales;

CREATE TABLE best_buy_sales (
    store_number INTEGER NOT NULL,
    date         TEXT    NOT NULL,   -- ISO 8601 calendar date
    weekly_sales REAL    NOT NULL,
    festive_week INTEGER NOT NULL,   -- 0 | 1
    inflation    REAL    NOT NULL,
    fuel_cost    REAL    NOT NULL,
    jobless_rate REAL    NOT NULL,
    loaded_at    TEXT    NOT NULL,   -- RFC 3339 UTC; one value per load
    source_file  TEXT
);

CREATE INDEX best_buy_sales_store_idx ON best_buy_sales(store_number);
";

pub const INSERT_SALE: &str = "
INSERT INTO best_buy_sales (
    store_number, date, weekly_sales, festive_week,
    inflation, fuel_cost, jobless_rate, loaded_at, source_file
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

pub const SELECT_SALES: &str = "
SELECT store_number, date, weekly_sales, festive_week,
       inflation, fuel_cost, jobless_rate
FROM best_buy_sales
ORDER BY store_number, date";

pub const TABLE_EXISTS: &str =
  "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1";

pub const COUNT_SALES: &str = "SELECT COUNT(*) FROM best_buy_sales";
