//! Group Statistics Table
//!
//! Turns the grouped samples of one run into one summary row per key.
//!
//! ```text
//! Groups ──trim──► samples ──compute_summary (rayon)──► GroupRow ──► GroupTable
//!                                  │
//!                                  └─ EmptyGroup: sentinel row if the key is
//!                                     expected, otherwise the key is dropped
//! ```

use crate::accumulator::Groups;
use crate::extract::GroupKey;
use logagg_stats::{StatsConfig, StatsError, SummaryStatistics, compute_summary};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Drop a leading and trailing fraction of each group's samples (arrival order).
///
/// Keeps the slice `[floor(initial * n), floor(final * n) + 1)`, clamped to
/// the group. The defaults keep everything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trim {
    /// Fraction of leading samples to drop
    #[serde(default)]
    pub initial_fraction: f64,
    /// Fraction of samples to keep up to
    #[serde(default = "default_final_fraction")]
    pub final_fraction: f64,
}

impl Default for Trim {
    fn default() -> Self {
        Self {
            initial_fraction: 0.0,
            final_fraction: default_final_fraction(),
        }
    }
}

fn default_final_fraction() -> f64 {
    1.0
}

impl Trim {
    /// Check `0 <= initial <= final <= 1`
    pub fn validate(&self) -> Result<(), String> {
        let ok = (0.0..=1.0).contains(&self.initial_fraction)
            && (0.0..=1.0).contains(&self.final_fraction)
            && self.initial_fraction <= self.final_fraction;
        if ok {
            Ok(())
        } else {
            Err(format!(
                "trim fractions must satisfy 0 <= initial <= final <= 1, got {} and {}",
                self.initial_fraction, self.final_fraction
            ))
        }
    }

    /// Whether this trim keeps every sample
    pub fn is_identity(&self) -> bool {
        self.initial_fraction == 0.0 && self.final_fraction >= 1.0
    }

    /// Trimmed view of `samples`
    pub fn apply<'a>(&self, samples: &'a [f64]) -> &'a [f64] {
        let n = samples.len();
        let start = ((self.initial_fraction * n as f64).floor() as usize).min(n);
        let end = ((self.final_fraction * n as f64).floor() as usize + 1).min(n);
        if start >= end {
            &[]
        } else {
            &samples[start..end]
        }
    }
}

/// How a group table is computed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableConfig {
    /// Statistics to compute
    pub stats: StatsConfig,
    /// Per-group trim
    pub trim: Trim,
    /// Keys that always get a row, with sentinel statistics when empty
    pub expected_keys: Vec<GroupKey>,
}

/// One row of the statistics table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    /// Group key
    pub key: GroupKey,
    /// Statistics of the group
    pub summary: SummaryStatistics,
}

/// Rows ordered by key ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupTable {
    /// One row per key
    pub rows: Vec<GroupRow>,
}

impl GroupTable {
    /// Row for `key`
    pub fn get(&self, key: &GroupKey) -> Option<&GroupRow> {
        self.rows.iter().find(|row| &row.key == key)
    }

    /// Sum of sample counts over all rows
    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|row| row.summary.count).sum()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no row exists
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Compute one summary row per group (parallelized with Rayon).
///
/// Rows come out in key order regardless of scheduling. Groups that end up
/// empty after trimming are omitted unless listed in `expected_keys`, in which
/// case they carry [`SummaryStatistics::sentinel`].
pub fn summarize_groups(groups: &Groups, config: &TableConfig) -> Result<GroupTable, StatsError> {
    config.stats.validate()?;

    let keys: BTreeSet<&GroupKey> = groups.keys().chain(config.expected_keys.iter()).collect();
    let keys: Vec<&GroupKey> = keys.into_iter().collect();

    let rows = keys
        .par_iter()
        .map(|&key| {
            let samples = groups
                .get(key)
                .map(|s| config.trim.apply(s))
                .unwrap_or(&[]);

            match compute_summary(samples, &config.stats) {
                Ok(summary) => Ok(Some(GroupRow {
                    key: key.clone(),
                    summary,
                })),
                Err(StatsError::EmptyGroup) if config.expected_keys.contains(key) => {
                    Ok(Some(GroupRow {
                        key: key.clone(),
                        summary: SummaryStatistics::sentinel(&config.stats),
                    }))
                }
                Err(StatsError::EmptyGroup) => {
                    debug!(key = %key, "omitting empty group");
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .collect::<Result<Vec<_>, StatsError>>()?;

    Ok(GroupTable {
        rows: rows.into_iter().flatten().collect(),
    })
}
