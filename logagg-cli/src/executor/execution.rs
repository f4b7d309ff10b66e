//! Aggregation Execution
//!
//! Feeds every resolved input file through the planned aggregation. One
//! context per call, so repeated executions never share groups.

use crate::planner::AggregationPlan;
use logagg_core::{AggregateError, GroupedSamples};
use std::time::Instant;
use tracing::info;

/// Execute the aggregation of `plan` over all its inputs
pub fn execute_plan(plan: &AggregationPlan) -> Result<GroupedSamples, AggregateError> {
    let start = Instant::now();
    let grouped = plan.aggregation.run(&plan.inputs)?;
    info!(
        root = %plan.inputs.root().display(),
        groups = grouped.group_count(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "inputs aggregated"
    );
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogaggConfig;
    use crate::planner::{PlanOptions, build_plan};
    use logagg_core::GroupKey;

    #[test]
    fn test_execute_directory_plan() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("host1"), "read 4\nwrite 9\n").unwrap();
        std::fs::write(dir.path().join("host2"), "read 6\n").unwrap();

        let options = PlanOptions {
            input: dir.path().to_path_buf(),
            ..Default::default()
        };
        let plan = build_plan(&options, &LogaggConfig::default()).unwrap();
        let grouped = execute_plan(&plan).unwrap();

        assert_eq!(grouped.stats.files, 2);
        assert_eq!(grouped.groups[&GroupKey::text("read")], vec![4.0, 6.0]);
        assert_eq!(grouped.groups[&GroupKey::text("write")], vec![9.0]);
    }

    #[test]
    fn test_executions_are_independent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("latency.log");
        std::fs::write(&input, "a 1\na 2\n").unwrap();

        let options = PlanOptions {
            input,
            ..Default::default()
        };
        let plan = build_plan(&options, &LogaggConfig::default()).unwrap();
        let first = execute_plan(&plan).unwrap();
        let second = execute_plan(&plan).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.stats.accepted, 2);
    }
}
