//! Summary Statistics
//!
//! Computes the per-group summary row:
//! - count, mean, sample standard deviation
//! - min, max
//! - median (lower-middle by default, interpolated on request)
//! - configured percentiles (sorted-index definition)
//!
//! An empty group is an error here, never a division by zero. Callers that
//! need a fixed-shape row per key substitute [`SummaryStatistics::sentinel`].

use crate::percentiles::{median_of_sorted, percentile_of_sorted, sort_samples};
use crate::{DEFAULT_PERCENTILE, SENTINEL_VALUE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the statistics engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Summary requested over zero samples
    #[error("group has no samples")]
    EmptyGroup,

    /// Percentile rank outside `0..=100`
    #[error("invalid percentile: {0} (must be within 0..=100)")]
    InvalidPercentile(f64),
}

/// How the median of an even-sized group is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum MedianPolicy {
    /// Element at index `(count - 1) / 2` of the sorted samples.
    /// Matches historical experiment output.
    #[default]
    LowerMiddle,
    /// Mean of the two middle elements for even counts
    Interpolated,
}

impl std::str::FromStr for MedianPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lower-middle" | "lower" => Ok(MedianPolicy::LowerMiddle),
            "interpolated" | "standard" => Ok(MedianPolicy::Interpolated),
            other => Err(format!("Unknown median policy: {}", other)),
        }
    }
}

/// Statistics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Percentile ranks to report, in output column order
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
    /// Median convention
    #[serde(default)]
    pub median: MedianPolicy,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            percentiles: default_percentiles(),
            median: MedianPolicy::default(),
        }
    }
}

fn default_percentiles() -> Vec<f64> {
    vec![DEFAULT_PERCENTILE]
}

impl StatsConfig {
    /// Reject percentile ranks outside `0..=100`
    pub fn validate(&self) -> Result<(), StatsError> {
        match self
            .percentiles
            .iter()
            .find(|p| !(0.0..=100.0).contains(*p))
        {
            Some(&p) => Err(StatsError::InvalidPercentile(p)),
            None => Ok(()),
        }
    }
}

/// One configured percentile and its value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileValue {
    /// Rank in percent, e.g. 90.0
    pub rank: f64,
    /// Sample at that rank
    pub value: f64,
}

impl PercentileValue {
    /// Column label for this rank: `p90`, `p99.9`
    pub fn label(&self) -> String {
        format!("p{}", self.rank)
    }
}

/// Summary statistics for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean, clamped to `[min, max]`
    pub mean: f64,
    /// Sample standard deviation (0 for a single sample)
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Median under the configured [`MedianPolicy`]
    pub median: f64,
    /// Configured percentiles, in configuration order
    pub percentiles: Vec<PercentileValue>,
}

impl SummaryStatistics {
    /// Fixed-shape placeholder for a group with no samples: count 0 and every
    /// statistic set to [`SENTINEL_VALUE`].
    pub fn sentinel(config: &StatsConfig) -> Self {
        Self {
            count: 0,
            mean: SENTINEL_VALUE,
            std_dev: SENTINEL_VALUE,
            min: SENTINEL_VALUE,
            max: SENTINEL_VALUE,
            median: SENTINEL_VALUE,
            percentiles: config
                .percentiles
                .iter()
                .map(|&rank| PercentileValue {
                    rank,
                    value: SENTINEL_VALUE,
                })
                .collect(),
        }
    }

    /// Whether this is the empty-group placeholder
    pub fn is_sentinel(&self) -> bool {
        self.count == 0
    }

    /// Value of a configured percentile rank
    pub fn percentile(&self, rank: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| (p.rank - rank).abs() < f64::EPSILON)
            .map(|p| p.value)
    }

    /// 90th percentile, if configured
    pub fn p90(&self) -> Option<f64> {
        self.percentile(90.0)
    }

    /// Named statistics in output order: count, mean, min, max, median, then percentiles.
    pub fn named_values(&self) -> Vec<(String, f64)> {
        let mut values = vec![
            ("count".to_string(), self.count as f64),
            ("mean".to_string(), self.mean),
            ("min".to_string(), self.min),
            ("max".to_string(), self.max),
            ("median".to_string(), self.median),
        ];
        values.extend(self.percentiles.iter().map(|p| (p.label(), p.value)));
        values
    }
}

/// Arithmetic mean, `EmptyGroup` when there is nothing to average
pub fn compute_mean(samples: &[f64]) -> Result<f64, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptyGroup);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Compute summary statistics for one group of samples
///
/// # Examples
///
/// ```
/// # use logagg_stats::{StatsConfig, compute_summary};
/// let summary = compute_summary(&[10.0, 20.0], &StatsConfig::default()).unwrap();
/// assert_eq!(summary.count, 2);
/// assert_eq!(summary.mean, 15.0);
/// assert_eq!(summary.median, 10.0);
/// assert_eq!(summary.p90(), Some(20.0));
/// ```
pub fn compute_summary(
    samples: &[f64],
    config: &StatsConfig,
) -> Result<SummaryStatistics, StatsError> {
    config.validate()?;
    if samples.is_empty() {
        return Err(StatsError::EmptyGroup);
    }

    let sorted = sort_samples(samples);
    let n = sorted.len();
    let min = sorted[0];
    let max = sorted[n - 1];

    // Summation error can push the mean of identical values just past them
    let mean = compute_mean(&sorted)?.clamp(min, max);

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    let median = median_of_sorted(&sorted, config.median).ok_or(StatsError::EmptyGroup)?;

    let percentiles = config
        .percentiles
        .iter()
        .map(|&rank| {
            percentile_of_sorted(&sorted, rank)
                .map(|value| PercentileValue { rank, value })
                .ok_or(StatsError::EmptyGroup)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SummaryStatistics {
        count: n,
        mean,
        std_dev,
        min,
        max,
        median,
        percentiles,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let summary = compute_summary(&samples, &StatsConfig::default()).unwrap();

        assert!((summary.mean - 3.0).abs() < 0.01);
        assert!((summary.median - 3.0).abs() < 0.01);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.count, 5);
        assert_eq!(summary.p90(), Some(5.0));
    }

    #[test]
    fn test_two_sample_group() {
        let summary = compute_summary(&[20.0, 10.0], &StatsConfig::default()).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, 15.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 20.0);
        assert_eq!(summary.median, 10.0);
    }

    #[test]
    fn test_interpolated_policy() {
        let config = StatsConfig {
            median: MedianPolicy::Interpolated,
            ..Default::default()
        };
        let summary = compute_summary(&[20.0, 10.0], &config).unwrap();
        assert_eq!(summary.median, 15.0);
    }

    #[test]
    fn test_single_sample() {
        let summary = compute_summary(&[5.0], &StatsConfig::default()).unwrap();
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.min, 5.0);
        assert_eq!(summary.max, 5.0);
        assert_eq!(summary.median, 5.0);
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn test_mean_stays_within_bounds() {
        let samples = vec![0.1; 3];
        let summary = compute_summary(&samples, &StatsConfig::default()).unwrap();
        assert!(summary.min <= summary.mean && summary.mean <= summary.max);
    }

    #[test]
    fn test_empty_samples() {
        assert_eq!(
            compute_summary(&[], &StatsConfig::default()),
            Err(StatsError::EmptyGroup)
        );
        assert_eq!(compute_mean(&[]), Err(StatsError::EmptyGroup));
    }

    #[test]
    fn test_sentinel_shape() {
        let config = StatsConfig {
            percentiles: vec![90.0, 99.0],
            ..Default::default()
        };
        let sentinel = SummaryStatistics::sentinel(&config);
        assert!(sentinel.is_sentinel());
        assert_eq!(sentinel.mean, SENTINEL_VALUE);
        assert_eq!(sentinel.percentiles.len(), 2);
        assert_eq!(sentinel.percentile(99.0), Some(SENTINEL_VALUE));
    }

    #[test]
    fn test_invalid_percentile() {
        let config = StatsConfig {
            percentiles: vec![90.0, 120.0],
            ..Default::default()
        };
        assert_eq!(
            compute_summary(&[1.0], &config),
            Err(StatsError::InvalidPercentile(120.0))
        );
    }

    #[test]
    fn test_named_values_order() {
        let config = StatsConfig {
            percentiles: vec![90.0, 99.9],
            ..Default::default()
        };
        let summary = compute_summary(&[1.0, 2.0, 3.0], &config).unwrap();
        let names: Vec<String> = summary.named_values().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["count", "mean", "min", "max", "median", "p90", "p99.9"]);
    }

    #[test]
    fn test_parse_median_policy() {
        assert_eq!("lower-middle".parse(), Ok(MedianPolicy::LowerMiddle));
        assert_eq!("Interpolated".parse(), Ok(MedianPolicy::Interpolated));
        assert!("mode".parse::<MedianPolicy>().is_err());
    }
}
