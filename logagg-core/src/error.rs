//! Error taxonomy for the aggregation pipeline.

use logagg_stats::StatsError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single line could not contribute to any group.
///
/// These never abort a run: the context counts them and moves on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineParseError {
    /// The line has fewer tokens than the requested column needs
    #[error("missing column {column} (line has {len} tokens)")]
    MissingColumn {
        /// Requested column index
        column: usize,
        /// Tokens on the line
        len: usize,
    },

    /// The value (or numeric key) column is not a finite number
    #[error("column {column} is not numeric: {token:?}")]
    NotNumeric {
        /// Column index
        column: usize,
        /// Offending token
        token: String,
    },

    /// The key transform rejected the key
    #[error("key transform failed: {0}")]
    Transform(String),

    /// The filter expression could not be evaluated on this line
    #[error("filter evaluation failed: {0}")]
    Filter(String),
}

/// Errors that stop an aggregation call
#[derive(Debug, Error)]
pub enum AggregateError {
    /// Input path does not exist, or a directory holds no matching file
    #[error("input not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Reading an input failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A setting was rejected before any input was read
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Statistics engine error
    #[error(transparent)]
    Stats(#[from] StatsError),
}
