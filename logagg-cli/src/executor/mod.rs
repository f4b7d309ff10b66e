//! Aggregation Executor
//!
//! Runs a planned aggregation and turns its result into output.
//!
//! ## Pipeline Overview
//!
//! ```text
//! AggregationPlan (from planner)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Read inputs, group (key, value) pairs
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Group table, CDFs, overall summary (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  JSON report with run metadata
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Human-readable output
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Input reading and grouping
//! - [`statistics`] - Parallel statistics and CDF computation
//! - [`report`] - Report building
//! - [`formatting`] - Human-readable output formatting

mod execution;
mod formatting;
mod report;
mod statistics;

// Re-export public API
pub use execution::execute_plan;
pub use formatting::{format_human_output, format_human_summary};
pub use report::build_report;
pub use statistics::{compute_cdfs, compute_overall, compute_statistics};
