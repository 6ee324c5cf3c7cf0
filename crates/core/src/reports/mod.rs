//! Read-only aggregation over the transaction log.
//!
//! Nothing here is stored. Every summary is recomputed from the
//! transactions it is given:
//! - Transaction filtering (trust, course, type, date range)
//! - Per-course outflow summaries and drill-down
//! - Per-trust and per-day totals

pub mod filter;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use filter::{DateRange, TransactionFilter};
pub use service::ReportService;
pub use types::*;
