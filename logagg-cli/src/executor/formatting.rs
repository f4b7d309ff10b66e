//! Output Formatting
//!
//! Human-readable output for terminals:
//! - One aligned row per group (count, mean, min, max, median, percentiles)
//! - Run counters, including how many lines were skipped

use logagg_core::{GroupTable, RunStats};
use logagg_report::stats_header;
use logagg_stats::{StatsConfig, SummaryStatistics};

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value)
    } else {
        format!("{:.3}", value)
    }
}

fn push_run_counters(output: &mut String, stats: &RunStats, groups: usize) {
    output.push_str(&format!(
        "{} lines in {} file(s): {} accepted, {} filtered, {} blank, {} skipped; {} group(s)\n",
        stats.lines, stats.files, stats.accepted, stats.filtered, stats.blank, stats.errors, groups
    ));
}

/// Format a group table for terminal display
pub fn format_human_output(table: &GroupTable, config: &StatsConfig, stats: &RunStats) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("logagg Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    let header = stats_header(config);
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| {
            let mut fields = vec![row.key.to_string()];
            fields.extend(
                row.summary
                    .named_values()
                    .into_iter()
                    .map(|(_, v)| format_value(v)),
            );
            fields
        })
        .collect();

    // Column widths over header and body
    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .chain(std::iter::once(&header[i]))
                .map(|s| s.len())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_line = |fields: &[String]| {
        let cells: Vec<String> = fields
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (field, &width))| {
                if i == 0 {
                    format!("{:<width$}", field)
                } else {
                    format!("{:>width$}", field)
                }
            })
            .collect();
        format!("  {}\n", cells.join("  "))
    };

    if rows.is_empty() {
        output.push_str("  no groups\n");
    } else {
        output.push_str(&format_line(&header));
        let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        output.push_str(&format!("  {}\n", "-".repeat(total)));
        for row in &rows {
            output.push_str(&format_line(row));
        }
    }

    output.push('\n');
    push_run_counters(&mut output, stats, table.len());
    output
}

/// Format the all-samples summary for terminal display
pub fn format_human_summary(summary: &SummaryStatistics, stats: &RunStats, groups: usize) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str("logagg Summary\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    let values = summary.named_values();
    let width = values.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in &values {
        output.push_str(&format!("  {:<width$}  {}\n", name, format_value(*value)));
    }

    output.push('\n');
    push_run_counters(&mut output, stats, groups);
    output
}
