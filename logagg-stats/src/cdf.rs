//! Cumulative Distribution Tables
//!
//! One row per sample, sorted ascending, paired with the fraction of samples
//! at or below its rank. Repeated values keep their multiplicity.

use crate::percentiles::sort_samples;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// One row of a CDF table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdfPoint {
    /// Sample value
    pub value: f64,
    /// `(rank + 1) / count` for the 0-indexed rank of this sample
    pub fraction: f64,
}

/// Build the CDF table of `samples`
///
/// # Examples
///
/// ```
/// # use logagg_stats::compute_cdf;
/// let cdf = compute_cdf(&[20.0, 5.0, 10.0]);
/// assert_eq!(cdf.len(), 3);
/// assert_eq!(cdf[0].value, 5.0);
/// assert_eq!(cdf[2].fraction, 1.0);
/// ```
pub fn compute_cdf(samples: &[f64]) -> Vec<CdfPoint> {
    let sorted = sort_samples(samples);
    let n = sorted.len() as f64;
    sorted
        .into_iter()
        .enumerate()
        .map(|(rank, value)| CdfPoint {
            value,
            fraction: (rank + 1) as f64 / n,
        })
        .collect()
}

/// Randomly keep about `max_points` rows of a large CDF table.
///
/// Each row survives with probability `max_points / len`; the last row is
/// always kept so the curve still ends at 1.0. The generator is seeded, so
/// the same table, bound and seed always select the same rows.
/// A `max_points` of 0 or a table already within bounds is returned as is.
pub fn thin_cdf(points: Vec<CdfPoint>, max_points: usize, seed: u64) -> Vec<CdfPoint> {
    if max_points == 0 || points.len() <= max_points {
        return points;
    }

    let keep = max_points as f64 / points.len() as f64;
    let last = points.len() - 1;
    let mut rng = StdRng::seed_from_u64(seed);

    points
        .into_iter()
        .enumerate()
        .filter_map(|(i, point)| {
            // Draw for every row so the selection depends only on the seed
            let sampled = rng.gen_bool(keep);
            (sampled || i == last).then_some(point)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_sample_cdf() {
        let cdf = compute_cdf(&[5.0, 10.0, 20.0]);
        assert_eq!(cdf.len(), 3);
        assert_eq!(cdf[0].value, 5.0);
        assert!((cdf[0].fraction - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(cdf[1].value, 10.0);
        assert!((cdf[1].fraction - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(cdf[2].value, 20.0);
        assert_eq!(cdf[2].fraction, 1.0);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let cdf = compute_cdf(&[7.0, 7.0, 7.0, 1.0]);
        assert_eq!(cdf.len(), 4);
        let fractions: Vec<f64> = cdf.iter().map(|p| p.fraction).collect();
        assert_eq!(fractions, vec![0.25, 0.5, 0.75, 1.0]);
        assert!(cdf[1..].iter().all(|p| p.value == 7.0));
    }

    #[test]
    fn test_fractions_non_decreasing() {
        let samples: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64).collect();
        let cdf = compute_cdf(&samples);
        assert_eq!(cdf.len(), samples.len());
        assert!(cdf.windows(2).all(|w| w[0].fraction <= w[1].fraction));
        assert!(cdf.windows(2).all(|w| w[0].value <= w[1].value));
        assert!((cdf.last().unwrap().fraction - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_cdf() {
        assert!(compute_cdf(&[]).is_empty());
    }

    #[test]
    fn test_thin_within_bounds_is_identity() {
        let cdf = compute_cdf(&[1.0, 2.0, 3.0]);
        assert_eq!(thin_cdf(cdf.clone(), 10, 7), cdf);
        assert_eq!(thin_cdf(cdf.clone(), 0, 7), cdf);
    }

    #[test]
    fn test_thin_keeps_last_row_and_is_deterministic() {
        let samples: Vec<f64> = (0..20_000).map(|i| i as f64).collect();
        let cdf = compute_cdf(&samples);

        let a = thin_cdf(cdf.clone(), 1_000, 42);
        let b = thin_cdf(cdf, 1_000, 42);

        assert_eq!(a, b);
        assert!(a.len() < 2_000);
        assert_eq!(a.last().unwrap().fraction, 1.0);
        assert!(a.windows(2).all(|w| w[0].fraction <= w[1].fraction));
    }
}
