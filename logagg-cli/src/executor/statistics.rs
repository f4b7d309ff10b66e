//! Statistics Computation
//!
//! Group table, per-group CDFs and the overall summary of one run. All three
//! see the same trimmed samples. Groups are independent, so CDFs are built in
//! parallel with Rayon; results keep key order regardless of scheduling.

use crate::planner::CdfSettings;
use logagg_core::{AggregateError, GroupKey, GroupTable, GroupedSamples, TableConfig, Trim};
use logagg_stats::{
    CdfPoint, StatsError, SummaryStatistics, compute_cdf, compute_summary, thin_cdf,
};
use rayon::prelude::*;
use tracing::debug;

/// Compute the statistics table of every group
pub fn compute_statistics(
    grouped: &GroupedSamples,
    config: &TableConfig,
) -> Result<GroupTable, AggregateError> {
    grouped.summarize(config)
}

/// CDF table of every group after `trim`, thinned when `settings.max_points`
/// is set. Groups trimmed down to nothing are left out.
pub fn compute_cdfs(
    grouped: &GroupedSamples,
    settings: &CdfSettings,
    trim: &Trim,
) -> Vec<(GroupKey, Vec<CdfPoint>)> {
    let groups: Vec<(&GroupKey, &[f64])> = grouped
        .groups
        .iter()
        .map(|(key, samples)| (key, trim.apply(samples)))
        .filter(|(_, samples)| !samples.is_empty())
        .collect();
    groups
        .par_iter()
        .map(|&(key, samples)| {
            let mut points = compute_cdf(samples);
            if let Some(max_points) = settings.max_points {
                let full = points.len();
                points = thin_cdf(points, max_points, settings.seed);
                if points.len() < full {
                    debug!(key = %key, full, kept = points.len(), "thinned cdf");
                }
            }
            (key.clone(), points)
        })
        .collect()
}

/// Summary over every sample left after trimming each group.
///
/// With no samples at all this is the sentinel row, so the output keeps its
/// shape.
pub fn compute_overall(
    grouped: &GroupedSamples,
    config: &TableConfig,
) -> Result<SummaryStatistics, AggregateError> {
    match compute_summary(&grouped.trimmed_values(&config.trim), &config.stats) {
        Ok(summary) => Ok(summary),
        Err(StatsError::EmptyGroup) => Ok(SummaryStatistics::sentinel(&config.stats)),
        Err(e) => Err(e.into()),
    }
}
