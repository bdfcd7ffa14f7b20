//! Test-run summary reporter and static HTML dashboard for Playwright runs.
//!
//! The pipeline has two stages:
//! 1. [`reporter::aggregator::SummaryAggregator`] consumes run lifecycle
//!    events and writes `learning-summary.json`.
//! 2. [`dashboard::render`] reads that summary plus the engine's
//!    `results.json` and writes `learning-dashboard.html`.

pub mod cli;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod persist;
pub mod reporter;
pub mod summary;
