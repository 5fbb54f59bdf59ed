//! Core types and the store-performance analyzer for StorePulse.
//!
//! This crate is deliberately free of database and I/O dependencies. The
//! analyzer is a pure function over weekly sales records; storage backends
//! implement [`store::SalesStore`] to feed it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod metrics;
pub mod performance;
pub mod sale;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
pub use performance::{InflationPolicy, PerformanceReport, StorePerformance, analyze};
pub use sale::{InflationCategory, WeeklySale};
