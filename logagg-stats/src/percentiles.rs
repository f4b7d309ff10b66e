//! Percentile Computation
//!
//! Percentiles use a sorted-index definition: the sample at
//! `floor(count * p / 100)` in ascending order, clamped to the last index.
//! Nothing is interpolated, so every reported percentile is an observed sample.

use crate::summary::MedianPolicy;

/// Return an ascending copy of `samples`.
///
/// Uses IEEE total ordering so the result is deterministic even if a caller
/// slips a NaN through.
pub fn sort_samples(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Percentile of already-sorted samples, `None` when empty.
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let n = sorted.len();
    // `as usize` saturates: negative ranks land on 0, oversized ranks are clamped below
    let index = ((n as f64) * percentile / 100.0).floor() as usize;
    Some(sorted[index.min(n - 1)])
}

/// Compute a single percentile from unsorted samples
///
/// # Examples
///
/// ```
/// # use logagg_stats::compute_percentile;
/// let samples = vec![30.0, 10.0, 20.0, 40.0];
/// assert_eq!(compute_percentile(&samples, 50.0), Some(30.0));
/// assert_eq!(compute_percentile(&samples, 90.0), Some(40.0));
/// assert_eq!(compute_percentile(&[], 90.0), None);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> Option<f64> {
    percentile_of_sorted(&sort_samples(samples), percentile)
}

/// Median of already-sorted samples under the given policy.
pub fn median_of_sorted(sorted: &[f64], policy: MedianPolicy) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let n = sorted.len();
    match policy {
        MedianPolicy::LowerMiddle => Some(sorted[(n - 1) / 2]),
        MedianPolicy::Interpolated => {
            if n % 2 == 0 {
                let mid = n / 2;
                Some((sorted[mid - 1] + sorted[mid]) / 2.0)
            } else {
                Some(sorted[n / 2])
            }
        }
    }
}

/// Median of unsorted samples under the given policy.
pub fn compute_median(samples: &[f64], policy: MedianPolicy) -> Option<f64> {
    median_of_sorted(&sort_samples(samples), policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_index_percentile() {
        let samples: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        // floor(10 * 0.9) = 9 -> tenth smallest
        assert_eq!(compute_percentile(&samples, 90.0), Some(10.0));
        // floor(10 * 0.5) = 5 -> sixth smallest
        assert_eq!(compute_percentile(&samples, 50.0), Some(6.0));
        assert_eq!(compute_percentile(&samples, 0.0), Some(1.0));
    }

    #[test]
    fn test_percentile_clamps_to_range() {
        let samples = vec![3.0, 1.0, 2.0];
        assert_eq!(compute_percentile(&samples, 100.0), Some(3.0));
        assert_eq!(compute_percentile(&samples, 250.0), Some(3.0));
        assert_eq!(compute_percentile(&samples, -5.0), Some(1.0));
    }

    #[test]
    fn test_percentile_is_an_observed_sample() {
        let samples: Vec<f64> = (1..=1000).map(|x| x as f64 * 0.5).collect();
        let p99 = compute_percentile(&samples, 99.0).unwrap();
        assert!(samples.contains(&p99));
    }

    #[test]
    fn test_single_sample() {
        assert_eq!(compute_percentile(&[42.0], 90.0), Some(42.0));
        assert_eq!(compute_median(&[42.0], MedianPolicy::LowerMiddle), Some(42.0));
    }

    #[test]
    fn test_empty_samples() {
        assert_eq!(compute_percentile(&[], 50.0), None);
        assert_eq!(compute_median(&[], MedianPolicy::Interpolated), None);
    }

    #[test]
    fn test_lower_middle_median() {
        assert_eq!(compute_median(&[20.0, 10.0], MedianPolicy::LowerMiddle), Some(10.0));
        assert_eq!(
            compute_median(&[4.0, 1.0, 3.0, 2.0], MedianPolicy::LowerMiddle),
            Some(2.0)
        );
        assert_eq!(compute_median(&[5.0, 1.0, 3.0], MedianPolicy::LowerMiddle), Some(3.0));
    }

    #[test]
    fn test_interpolated_median() {
        assert_eq!(compute_median(&[20.0, 10.0], MedianPolicy::Interpolated), Some(15.0));
        assert_eq!(compute_median(&[5.0, 1.0, 3.0], MedianPolicy::Interpolated), Some(3.0));
    }

    #[test]
    fn test_input_left_untouched() {
        let samples = vec![3.0, 1.0, 2.0];
        let _ = compute_percentile(&samples, 50.0);
        assert_eq!(samples, vec![3.0, 1.0, 2.0]);
    }
}
