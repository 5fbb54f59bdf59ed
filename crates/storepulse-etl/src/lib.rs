//! Weekly-sales CSV loader for StorePulse.
//!
//! Turns a retail sales export into cleaned [`storepulse_core::WeeklySale`]
//! records. Pure synchronous; no database dependencies. Persisting the
//! records is the job of a [`storepulse_core::store::SalesStore`].
//!
//! # Quick start
//!
//! ```no_run
//! use storepulse_etl::{read_sales_file, validate};
//!
//! let extraction = read_sales_file("sales.csv").unwrap();
//! let report = validate(&extraction.sales);
//! println!("{} rows from {} stores", report.rows, report.stores);
//! ```

pub mod error;
mod extract;
mod validate;

pub use error::{Error, Result};
pub use extract::{
  Extraction, OPTIONAL_COLUMNS, REQUIRED_COLUMNS, normalize_header, parse_date,
  read_sales, read_sales_file,
};
pub use validate::{ValidationReport, validate, validate_as_of};
