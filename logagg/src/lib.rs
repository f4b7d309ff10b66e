#![warn(missing_docs)]
//! # logagg
//!
//! Group-by statistics over whitespace-delimited experiment logs.
//!
//! Each log line is a record of whitespace-separated columns. logagg picks
//! one column as the grouping key and one as a numeric value, and reports
//! per key:
//! - **Statistics**: count, mean, min, max, median and configurable percentiles
//! - **CDF tables**: every sample with its cumulative fraction, optionally thinned
//! - **Labeled rows**: `readcount 42`, `readmean 3.5`, ... for downstream scripts
//!
//! Lines can be filtered by column equality, regex or an expression, numeric
//! keys can be bucketed into time windows, and malformed lines are counted
//! and skipped rather than aborting the run.
//!
//! ## Quick Start
//!
//! ```
//! use logagg::prelude::*;
//!
//! let aggregation = Aggregation::builder(0, 2)
//!     .filter(ColumnEquals::new(1, "read"))
//!     .build();
//!
//! let mut ctx = AggregationContext::new();
//! aggregation.process_lines(&mut ctx, ["h1 read 10", "h1 read 20", "h2 write 99"]);
//! let grouped = ctx.finish();
//!
//! let table = grouped.summarize(&TableConfig::default()).unwrap();
//! assert_eq!(table.len(), 1);
//! assert_eq!(table.rows[0].summary.mean, 15.0);
//!
//! let rows = stats_rows(&table, &StatsConfig::default(), false);
//! assert_eq!(render_rows(&rows, Delimiter::Space), "h1 2 15 10 20 10 20\n");
//! ```
//!
//! ## Command Line
//!
//! ```text
//! logagg --key-column 0 --value-column 2 --expect-key h3 -o out/stats.txt stat.log
//! logagg --where 1=read --format kv --label read stat.log summary
//! ```

// Re-export core types
pub use logagg_core::{
    AggregateError, Aggregation, AggregationBuilder, AggregationContext, AllOf, ColumnEquals,
    ColumnMatches, ExprFilter, GroupKey, GroupRow, GroupTable, GroupedSamples, InputSet,
    KeyTransform, LineFilter, LineParseError, Record, RunStats, TableConfig, TimeBucket, Trim,
    summarize_groups, tokenize,
};

// Re-export stats
pub use logagg_stats::{
    CdfPoint, MedianPolicy, StatsConfig, StatsError, SummaryStatistics, compute_cdf,
    compute_median, compute_percentile, compute_summary, thin_cdf,
};

// Re-export output
pub use logagg_report::{
    AggregationReport, Delimiter, OutputFormat, Row, WriteMode, cdf_rows, file_in_dir,
    generate_json_report, keyed_cdf_rows, labeled_rows, render_rows, run_summary_rows, stats_rows,
    write_rows, write_text,
};

// Re-export CLI entry points
pub use logagg_cli::{Cli, Commands, LogaggConfig, run, run_with_cli};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Aggregation, AggregationContext, ColumnEquals, Delimiter, ExprFilter, GroupKey,
        StatsConfig, TableConfig, WriteMode, render_rows, stats_rows, write_rows,
    };
}
