//! Report Data Structures

use chrono::{DateTime, Utc};
use logagg_core::{GroupRow, GroupTable, RunStats};
use serde::{Deserialize, Serialize};

/// Complete aggregation report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationReport {
    /// Run metadata
    pub meta: ReportMeta,
    /// Per-group statistics rows
    pub groups: Vec<GroupRow>,
    /// Line counters
    pub summary: RunStats,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// logagg version
    pub version: String,
    /// When the report was generated
    pub timestamp: DateTime<Utc>,
    /// Files that fed the run, in processing order
    pub inputs: Vec<String>,
    /// Key column index
    pub key_column: usize,
    /// Value column index
    pub value_column: usize,
}

impl ReportMeta {
    /// Metadata stamped with the crate version and the current time
    pub fn new(inputs: Vec<String>, key_column: usize, value_column: usize) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            inputs,
            key_column,
            value_column,
        }
    }
}

impl AggregationReport {
    /// Assemble a report from a computed table and the run counters
    pub fn new(meta: ReportMeta, table: GroupTable, summary: RunStats) -> Self {
        Self {
            meta,
            groups: table.rows,
            summary,
        }
    }

    /// Sum of sample counts over all groups
    pub fn total_count(&self) -> usize {
        self.groups.iter().map(|g| g.summary.count).sum()
    }
}
