//! Aggregation Pipeline
//!
//! ```text
//! file(s) ──lines──► Record ──filter──► LineDecoder ──► GroupAccumulator
//!                       │         │            │
//!                     blank    filtered      errors        (counted in RunStats)
//! ```
//!
//! All state of a run lives in an [`AggregationContext`] that the caller owns,
//! so independent aggregations never share anything.

use crate::accumulator::{GroupAccumulator, Groups};
use crate::error::{AggregateError, LineParseError};
use crate::extract::{GroupKey, KeySpec, KeyTransform, LineDecoder, ValueSpec};
use crate::filter::LineFilter;
use crate::input::InputSet;
use crate::record::Record;
use crate::table::{GroupTable, TableConfig, Trim, summarize_groups};
use logagg_stats::{CdfPoint, compute_cdf};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Malformed lines logged individually before going quiet
const LOGGED_ERRORS: usize = 5;

/// Line counters for one aggregation call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Files read
    pub files: usize,
    /// Lines seen, header lines excluded
    pub lines: usize,
    /// Lines without any token
    pub blank: usize,
    /// Lines that contributed a sample
    pub accepted: usize,
    /// Lines rejected by the filter
    pub filtered: usize,
    /// Lines that failed to parse
    pub errors: usize,
}

/// Per-call state: the group map plus counters
#[derive(Debug, Clone, Default)]
pub struct AggregationContext {
    groups: GroupAccumulator,
    stats: RunStats,
}

impl AggregationContext {
    /// Fresh, empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters so far
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Groups so far
    pub fn groups(&self) -> &GroupAccumulator {
        &self.groups
    }

    fn record_error(&mut self, line_number: usize, error: LineParseError) {
        self.stats.errors += 1;
        if self.stats.errors <= LOGGED_ERRORS {
            debug!(line = line_number, error = %error, "skipping malformed line");
        }
    }

    /// Close the run: report skipped lines once and hand out sorted groups
    pub fn finish(self) -> GroupedSamples {
        if self.stats.errors > 0 {
            warn!(
                errors = self.stats.errors,
                "skipped lines that failed to parse"
            );
        }
        GroupedSamples {
            groups: self.groups.into_sorted(),
            stats: self.stats,
        }
    }
}

/// Result of one aggregation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSamples {
    /// Samples per key, in arrival order
    pub groups: Groups,
    /// Line counters of the run
    pub stats: RunStats,
}

impl GroupedSamples {
    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Every sample of every group, in key order
    pub fn all_values(&self) -> Vec<f64> {
        self.groups.values().flatten().copied().collect()
    }

    /// Every sample left after trimming each group, in key order
    pub fn trimmed_values(&self, trim: &Trim) -> Vec<f64> {
        self.groups
            .values()
            .flat_map(|samples| trim.apply(samples))
            .copied()
            .collect()
    }

    /// Statistics table for all groups
    pub fn summarize(&self, config: &TableConfig) -> Result<GroupTable, AggregateError> {
        Ok(summarize_groups(&self.groups, config)?)
    }

    /// CDF table of each group, in key order
    pub fn cdfs(&self) -> Vec<(&GroupKey, Vec<CdfPoint>)> {
        self.groups
            .iter()
            .map(|(key, samples)| (key, compute_cdf(samples)))
            .collect()
    }
}

/// A configured aggregation: which lines count, and how each becomes a
/// `(key, value)` pair
pub struct Aggregation {
    decoder: LineDecoder,
    filter: Option<Box<dyn LineFilter>>,
    skip_header: usize,
}

impl Aggregation {
    /// Start building an aggregation keyed by `key_column`, valued by `value_column`
    pub fn builder(key_column: usize, value_column: usize) -> AggregationBuilder {
        AggregationBuilder {
            key: KeySpec::text(key_column),
            value: ValueSpec::new(value_column),
            filter: None,
            skip_header: 0,
        }
    }

    /// Decoder in use
    pub fn decoder(&self) -> &LineDecoder {
        &self.decoder
    }

    /// Feed one line into `ctx`
    pub fn process_line(&self, ctx: &mut AggregationContext, line_number: usize, line: &str) {
        ctx.stats.lines += 1;

        let record = Record::parse(line_number, line);
        if record.is_blank() {
            ctx.stats.blank += 1;
            return;
        }

        if let Some(filter) = &self.filter {
            match filter.accept(&record) {
                Ok(true) => {}
                Ok(false) => {
                    ctx.stats.filtered += 1;
                    return;
                }
                Err(e) => {
                    ctx.record_error(line_number, e);
                    return;
                }
            }
        }

        match self.decoder.decode(&record) {
            Ok(decoded) => {
                ctx.groups.push(decoded.key, decoded.value);
                ctx.stats.accepted += 1;
            }
            Err(e) => ctx.record_error(line_number, e),
        }
    }

    /// Feed in-memory lines into `ctx`
    pub fn process_lines<'a, I>(&self, ctx: &mut AggregationContext, lines: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for (i, line) in lines.into_iter().enumerate().skip(self.skip_header) {
            self.process_line(ctx, i + 1, line);
        }
    }

    /// Feed every line of `reader` into `ctx`.
    ///
    /// Bytes that are not UTF-8 are replaced, which makes the affected
    /// columns fail to parse instead of failing the whole file.
    pub fn process_reader<R: BufRead>(
        &self,
        ctx: &mut AggregationContext,
        mut reader: R,
    ) -> std::io::Result<()> {
        let mut buf = Vec::new();
        let mut line_number = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;
            if line_number <= self.skip_header {
                continue;
            }
            let line: Cow<'_, str> = String::from_utf8_lossy(&buf);
            self.process_line(ctx, line_number, &line);
        }
        Ok(())
    }

    /// Feed one file into `ctx`
    pub fn process_file(
        &self,
        ctx: &mut AggregationContext,
        path: &Path,
    ) -> Result<(), AggregateError> {
        let io_err = |source| AggregateError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        self.process_reader(ctx, BufReader::new(file))
            .map_err(io_err)?;
        ctx.stats.files += 1;
        debug!(path = %path.display(), lines = ctx.stats.lines, "processed input file");
        Ok(())
    }

    /// Aggregate every file of `inputs` into a fresh context
    pub fn run(&self, inputs: &InputSet) -> Result<GroupedSamples, AggregateError> {
        let mut ctx = AggregationContext::new();
        for path in inputs.files() {
            self.process_file(&mut ctx, path)?;
        }
        info!(
            files = ctx.stats.files,
            lines = ctx.stats.lines,
            accepted = ctx.stats.accepted,
            filtered = ctx.stats.filtered,
            groups = ctx.groups.len(),
            "aggregation complete"
        );
        Ok(ctx.finish())
    }

    /// Aggregate one file or directory
    pub fn run_path(&self, path: impl AsRef<Path>) -> Result<GroupedSamples, AggregateError> {
        let inputs = InputSet::resolve(path, None)?;
        self.run(&inputs)
    }
}

/// Builder for [`Aggregation`]
pub struct AggregationBuilder {
    key: KeySpec,
    value: ValueSpec,
    filter: Option<Box<dyn LineFilter>>,
    skip_header: usize,
}

impl AggregationBuilder {
    /// Parse keys as numbers instead of raw strings
    pub fn numeric_key(mut self, numeric: bool) -> Self {
        self.key.numeric = numeric;
        self
    }

    /// Map each extracted key (e.g. [`crate::TimeBucket`])
    pub fn key_transform(mut self, transform: impl KeyTransform + 'static) -> Self {
        self.key.transform = Some(Box::new(transform));
        self
    }

    /// Only aggregate lines accepted by `filter`
    pub fn filter(mut self, filter: impl LineFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Already boxed filter
    pub fn boxed_filter(mut self, filter: Box<dyn LineFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Ignore the first `lines` lines of every input
    pub fn skip_header(mut self, lines: usize) -> Self {
        self.skip_header = lines;
        self
    }

    /// Finish
    pub fn build(self) -> Aggregation {
        Aggregation {
            decoder: LineDecoder::new(self.key, self.value),
            filter: self.filter,
            skip_header: self.skip_header,
        }
    }
}
