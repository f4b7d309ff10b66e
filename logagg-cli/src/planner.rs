//! Aggregation Planner
//!
//! Layers `logagg.toml` defaults under command-line flags and turns the result
//! into a runnable plan:
//!
//! - which files to read ([`InputSet`])
//! - how lines become `(key, value)` pairs, and which lines count ([`Aggregation`])
//! - how groups become statistics rows ([`TableConfig`])
//! - how tables are written ([`OutputSettings`], [`CdfSettings`])
//!
//! Every setting is validated here, before any input is read.

use crate::config::LogaggConfig;
use logagg_core::{
    AggregateError, Aggregation, AllOf, ColumnEquals, ColumnMatches, ExprFilter, GroupKey,
    InputSet, TableConfig, TimeBucket, Trim,
};
use logagg_report::{Delimiter, OutputFormat, WriteMode};
use logagg_stats::{MedianPolicy, StatsConfig};
use regex::Regex;
use std::path::PathBuf;

/// Everything the command-line layer resolved, before config defaults apply
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Log file or directory
    pub input: PathBuf,
    /// Key column override
    pub key_column: Option<usize>,
    /// Value column override
    pub value_column: Option<usize>,
    /// Parse keys as numbers
    pub numeric_key: bool,
    /// Time-bucket width for numeric keys
    pub bucket_width: Option<f64>,
    /// `--where COL=VALUE` filters
    pub column_equals: Vec<(usize, String)>,
    /// `--match COL=REGEX` filters
    pub column_matches: Vec<(usize, String)>,
    /// `--filter` expression
    pub filter: Option<String>,
    /// Percentile ranks; empty means the config's
    pub percentiles: Vec<f64>,
    /// Median convention override
    pub median: Option<MedianPolicy>,
    /// Keys that always get a row
    pub expected_keys: Vec<String>,
    /// Leading fraction to drop per group
    pub trim_initial: Option<f64>,
    /// Fraction to keep up to per group
    pub trim_final: Option<f64>,
    /// CDF thinning target
    pub cdf_max_points: Option<usize>,
    /// Field delimiter override
    pub delimiter: Option<Delimiter>,
    /// Emit a header row
    pub header: bool,
    /// Leading lines to skip per file
    pub skip_header: Option<usize>,
    /// File-name regex for directory inputs
    pub pattern: Option<String>,
    /// Output format name
    pub format: Option<String>,
    /// Output file; stdout when `None`
    pub output: Option<PathBuf>,
    /// Append instead of truncate
    pub append: bool,
    /// Prefix of labeled rows
    pub label: Option<String>,
}

/// CDF output settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CdfSettings {
    /// Thin each CDF to about this many rows; all rows when `None`
    pub max_points: Option<usize>,
    /// Seed of the thinning RNG
    pub seed: u64,
}

/// Where and how tables are written
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Output format
    pub format: OutputFormat,
    /// Field delimiter
    pub delimiter: Delimiter,
    /// Header row on the statistics table
    pub header: bool,
    /// File destination; stdout when `None`
    pub path: Option<PathBuf>,
    /// Truncate or append
    pub mode: WriteMode,
    /// Prefix of labeled key/value rows
    pub label: String,
}

/// A validated, ready-to-run aggregation
pub struct AggregationPlan {
    /// Resolved input files
    pub inputs: InputSet,
    /// Line filtering and decoding
    pub aggregation: Aggregation,
    /// Key column index
    pub key_column: usize,
    /// Value column index
    pub value_column: usize,
    /// Statistics, trim and expected keys
    pub table: TableConfig,
    /// CDF settings
    pub cdf: CdfSettings,
    /// Output settings
    pub output: OutputSettings,
}

/// Parse a `COL=VALUE` command-line pair
pub fn parse_column_pair(s: &str) -> Result<(usize, String), String> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected COL=VALUE, got '{}'", s))?;
    let column = column
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid column index '{}'", column))?;
    Ok((column, value.to_string()))
}

fn invalid(msg: impl Into<String>) -> AggregateError {
    AggregateError::InvalidConfig(msg.into())
}

/// Build the plan for one run: flags win over `config`, which wins over defaults
pub fn build_plan(
    options: &PlanOptions,
    config: &LogaggConfig,
) -> Result<AggregationPlan, AggregateError> {
    let key_column = options.key_column.unwrap_or(config.input.key_column);
    let value_column = options.value_column.unwrap_or(config.input.value_column);
    let bucket_width = options.bucket_width.or(config.input.bucket_width);
    // Bucketing only makes sense on numbers
    let numeric_key = options.numeric_key || config.input.numeric_key || bucket_width.is_some();

    let pattern = options
        .pattern
        .as_deref()
        .or(config.input.pattern.as_deref())
        .map(Regex::new)
        .transpose()
        .map_err(|e| invalid(format!("bad file pattern: {}", e)))?;

    // Fail on a missing input before any output exists
    let inputs = InputSet::resolve(&options.input, pattern.as_ref())?;

    let mut builder = Aggregation::builder(key_column, value_column)
        .numeric_key(numeric_key)
        .skip_header(options.skip_header.unwrap_or(config.input.skip_header));
    if let Some(width) = bucket_width {
        builder = builder.key_transform(TimeBucket::new(width)?);
    }

    let mut filters = AllOf::new();
    for (column, value) in &options.column_equals {
        filters = filters.with(ColumnEquals::new(*column, value.clone()));
    }
    for (column, pattern) in &options.column_matches {
        let regex = Regex::new(pattern)
            .map_err(|e| invalid(format!("bad regex for column {}: {}", column, e)))?;
        filters = filters.with(ColumnMatches::new(*column, regex));
    }
    if let Some(expr) = &options.filter {
        let filter = ExprFilter::new(expr)
            .map_err(|e| invalid(format!("bad filter expression '{}': {}", expr, e)))?;
        filters = filters.with(filter);
    }
    if !filters.is_empty() {
        builder = builder.filter(filters);
    }

    let stats = StatsConfig {
        percentiles: if options.percentiles.is_empty() {
            config.stats.percentiles.clone()
        } else {
            options.percentiles.clone()
        },
        median: options.median.unwrap_or(config.stats.median),
    };
    stats.validate()?;

    let trim = Trim {
        initial_fraction: options.trim_initial.unwrap_or(config.stats.trim_initial),
        final_fraction: options.trim_final.unwrap_or(config.stats.trim_final),
    };
    trim.validate().map_err(invalid)?;

    let expected: &[String] = if options.expected_keys.is_empty() {
        &config.stats.expected_keys
    } else {
        &options.expected_keys
    };
    let expected_keys = expected
        .iter()
        .map(|k| GroupKey::parse(k, numeric_key))
        .collect();

    let format = options
        .format
        .as_deref()
        .unwrap_or(config.output.format.as_str())
        .parse::<OutputFormat>()
        .map_err(invalid)?;

    let cdf = CdfSettings {
        max_points: options.cdf_max_points.or(config.cdf.max_points),
        seed: config.cdf.seed,
    };
    if cdf.max_points == Some(0) {
        return Err(invalid("cdf max points must be at least 1"));
    }

    Ok(AggregationPlan {
        inputs,
        aggregation: builder.build(),
        key_column,
        value_column,
        table: TableConfig {
            stats,
            trim,
            expected_keys,
        },
        cdf,
        output: OutputSettings {
            format,
            delimiter: options.delimiter.unwrap_or(config.output.delimiter),
            header: options.header || config.output.header,
            path: options.output.clone(),
            mode: if options.append {
                WriteMode::Append
            } else {
                WriteMode::Truncate
            },
            label: options
                .label
                .clone()
                .unwrap_or_else(|| config.output.label.clone()),
        },
    })
}
