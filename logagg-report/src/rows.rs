//! Table Renderings
//!
//! Turns statistics into [`Row`]s for the writer. Numbers use `Display`,
//! which prints the shortest text that parses back to the same `f64`.

use crate::writer::Row;
use logagg_core::{GroupKey, GroupTable, RunStats};
use logagg_stats::{CdfPoint, StatsConfig, SummaryStatistics};

/// Header of the statistics table: `key count mean min max median p<rank>...`
pub fn stats_header(config: &StatsConfig) -> Row {
    let mut header: Row = ["key", "count", "mean", "min", "max", "median"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    header.extend(config.percentiles.iter().map(|rank| format!("p{}", rank)));
    header
}

fn summary_fields(summary: &SummaryStatistics) -> impl Iterator<Item = String> + '_ {
    summary
        .named_values()
        .into_iter()
        .map(|(_, value)| value.to_string())
}

/// One row per group, in table order, optionally preceded by [`stats_header`]
pub fn stats_rows(table: &GroupTable, config: &StatsConfig, header: bool) -> Vec<Row> {
    let mut rows = Vec::with_capacity(table.len() + usize::from(header));
    if header {
        rows.push(stats_header(config));
    }
    for row in &table.rows {
        let mut fields = vec![row.key.to_string()];
        fields.extend(summary_fields(&row.summary));
        rows.push(fields);
    }
    rows
}

/// `value fraction` rows of one group's CDF
pub fn cdf_rows(points: &[CdfPoint]) -> Vec<Row> {
    points
        .iter()
        .map(|p| vec![p.value.to_string(), p.fraction.to_string()])
        .collect()
}

/// `key value fraction` rows, for several groups sharing one file
pub fn keyed_cdf_rows<'a, I>(cdfs: I) -> Vec<Row>
where
    I: IntoIterator<Item = (&'a GroupKey, &'a [CdfPoint])>,
{
    let mut rows = Vec::new();
    for (key, points) in cdfs {
        let key = key.to_string();
        rows.extend(points.iter().map(|p| {
            vec![key.clone(), p.value.to_string(), p.fraction.to_string()]
        }));
    }
    rows
}

/// Labeled `name value` rows: `readcount 42`, `readmean 3.5`, `readp90 7`
pub fn labeled_rows(label: &str, summary: &SummaryStatistics) -> Vec<Row> {
    summary
        .named_values()
        .into_iter()
        .map(|(name, value)| vec![format!("{}{}", label, name), value.to_string()])
        .collect()
}

/// Run counters as `name value` rows
pub fn run_summary_rows(stats: &RunStats, groups: usize) -> Vec<Row> {
    [
        ("lines", stats.lines),
        ("blank", stats.blank),
        ("accepted", stats.accepted),
        ("filtered", stats.filtered),
        ("errors", stats.errors),
        ("files", stats.files),
        ("groups", groups),
    ]
    .iter()
    .map(|(name, value)| vec![name.to_string(), value.to_string()])
    .collect()
}
