//! Risk Dashboard — logistics security risk analysis over four tabular datasets.
//!
//! Modular structure:
//! - [`data`] — Incident, risk, metric and component records; CSV loading; quality checks
//! - [`filter`] — Date range, category and exact-match record filters
//! - [`aggregate`] — Grouped counts, sums, means and ratios feeding each chart
//! - [`projection`] — Linear loss trend and savings estimate
//! - [`report`] — The five dashboard pages
//! - [`logging`] — Structured logging

pub mod config;
pub mod error;
pub mod data;
pub mod filter;
pub mod aggregate;
pub mod projection;
pub mod report;
pub mod logging;
#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use config::DashboardConfig;
pub use error::{DivisionUndefined, LoadError, Ratio};
pub use data::{load_all, Dataset, QualityReport};
pub use filter::RecordFilter;
pub use projection::TrendProjector;
pub use report::Dashboard;
pub use logging::StructuredLogger;
