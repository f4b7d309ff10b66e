#![warn(missing_docs)]
//! logagg Statistical Engine
//!
//! Descriptive statistics for groups of latency samples:
//! - Summary (count, mean, standard deviation, min, max, median)
//! - Sorted-index percentiles (no interpolation)
//! - Cumulative distribution tables, optionally thinned for plotting
//!
//! Every function here is pure: it takes samples by reference, sorts a private
//! copy and never mutates its input.

mod cdf;
mod percentiles;
mod summary;

pub use cdf::{CdfPoint, compute_cdf, thin_cdf};
pub use percentiles::{
    compute_median, compute_percentile, median_of_sorted, percentile_of_sorted, sort_samples,
};
pub use summary::{
    MedianPolicy, PercentileValue, StatsConfig, StatsError, SummaryStatistics, compute_mean,
    compute_summary,
};

/// Percentile reported when no other list is configured
pub const DEFAULT_PERCENTILE: f64 = 90.0;

/// Marker written in place of every statistic of a group with no samples
pub const SENTINEL_VALUE: f64 = -1.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!((DEFAULT_PERCENTILE - 90.0).abs() < f64::EPSILON);
        assert!((SENTINEL_VALUE + 1.0).abs() < f64::EPSILON);
    }
}
