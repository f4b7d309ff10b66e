#![warn(missing_docs)]
//! logagg Core
//!
//! The aggregation pipeline: raw log lines in, grouped samples and group
//! statistics out.
//!
//! ```text
//! InputSet ──► Aggregation ──► AggregationContext ──► GroupedSamples ──► GroupTable
//!              (filter, key,    (group map, counters)   (sorted groups)    (one row per key)
//!               value columns)
//! ```
//!
//! # Example
//!
//! ```
//! use logagg_core::{Aggregation, AggregationContext, GroupKey, TableConfig};
//!
//! let aggregation = Aggregation::builder(0, 2).build();
//! let mut ctx = AggregationContext::new();
//! aggregation.process_lines(&mut ctx, ["a 1 10", "a 1 20", "b 1 5"]);
//!
//! let grouped = ctx.finish();
//! let table = grouped.summarize(&TableConfig::default()).unwrap();
//! let a = table.get(&GroupKey::text("a")).unwrap();
//! assert_eq!(a.summary.mean, 15.0);
//! assert_eq!(a.summary.median, 10.0);
//! ```

mod accumulator;
mod error;
mod extract;
mod filter;
mod input;
mod pipeline;
mod record;
mod table;

pub use accumulator::{GroupAccumulator, Groups};
pub use error::{AggregateError, LineParseError};
pub use extract::{
    DecodedLine, GroupKey, KeySpec, KeyTransform, LineDecoder, TimeBucket, ValueSpec,
};
pub use filter::{AcceptAll, AllOf, ColumnEquals, ColumnMatches, ExprFilter, LineFilter};
pub use input::InputSet;
pub use pipeline::{
    Aggregation, AggregationBuilder, AggregationContext, GroupedSamples, RunStats,
};
pub use record::{Record, tokenize};
pub use table::{GroupRow, GroupTable, TableConfig, Trim, summarize_groups};
