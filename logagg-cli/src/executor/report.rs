//! Report Building
//!
//! Wraps a computed group table with the metadata of the run that produced
//! it: which files were read, which columns were used, and when.

use crate::planner::AggregationPlan;
use logagg_core::{GroupTable, RunStats};
use logagg_report::{AggregationReport, ReportMeta};

/// Build a complete report from a plan and its computed table
pub fn build_report(plan: &AggregationPlan, table: GroupTable, stats: RunStats) -> AggregationReport {
    let inputs = plan
        .inputs
        .files()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    let meta = ReportMeta::new(inputs, plan.key_column, plan.value_column);
    AggregationReport::new(meta, table, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogaggConfig;
    use crate::executor::{compute_statistics, execute_plan};
    use crate::planner::{PlanOptions, build_plan};

    #[test]
    fn test_report_carries_run_metadata() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("latency.log");
        std::fs::write(&input, "a 1 10\na 1 20\nb 1 5\nb 1 x\n").unwrap();

        let options = PlanOptions {
            input: input.clone(),
            value_column: Some(2),
            ..Default::default()
        };
        let plan = build_plan(&options, &LogaggConfig::default()).unwrap();
        let grouped = execute_plan(&plan).unwrap();
        let table = compute_statistics(&grouped, &plan.table).unwrap();
        let report = build_report(&plan, table, grouped.stats);

        assert_eq!(report.meta.inputs, vec![input.display().to_string()]);
        assert_eq!(report.meta.value_column, 2);
        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.total_count(), 3);
        assert_eq!(report.summary.errors, 1);
    }
}
