//! JSON Output

use crate::report::AggregationReport;

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &AggregationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportMeta;
    use logagg_core::{GroupKey, GroupRow, GroupTable, RunStats};
    use logagg_stats::{StatsConfig, compute_summary};

    #[test]
    fn test_json_report_shape() {
        let table = GroupTable {
            rows: vec![GroupRow {
                key: GroupKey::text("a"),
                summary: compute_summary(&[10.0, 20.0], &StatsConfig::default()).unwrap(),
            }],
        };
        let stats = RunStats {
            files: 1,
            lines: 3,
            accepted: 2,
            errors: 1,
            ..Default::default()
        };
        let report = AggregationReport::new(
            ReportMeta::new(vec!["latency.log".to_string()], 0, 2),
            table,
            stats,
        );

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["meta"]["key_column"], 0);
        assert_eq!(value["meta"]["inputs"][0], "latency.log");
        assert_eq!(value["groups"][0]["key"], "a");
        assert_eq!(value["groups"][0]["summary"]["mean"], 15.0);
        assert_eq!(value["summary"]["errors"], 1);

        let back: AggregationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.total_count(), 2);
    }
}
