#![warn(missing_docs)]
//! logagg Report - Tables and Reports
//!
//! Generates various output formats:
//! - Delimited text tables (statistics, CDFs, labeled key/value rows)
//! - JSON (machine-readable)
//!
//! The aligned terminal table lives with the CLI.

mod json;
mod report;
mod rows;
mod writer;

pub use json::generate_json_report;
pub use report::{AggregationReport, ReportMeta};
pub use rows::{
    cdf_rows, keyed_cdf_rows, labeled_rows, run_summary_rows, stats_header, stats_rows,
};
pub use writer::{
    Delimiter, Row, WriteMode, file_in_dir, render_rows, write_rows, write_rows_to, write_text,
};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Delimited statistics table
    #[default]
    Table,
    /// JSON report
    Json,
    /// Aligned terminal table
    Human,
    /// Labeled `name value` rows
    KeyValue,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "tsv" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            "kv" | "key-value" => Ok(OutputFormat::KeyValue),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("KV".parse::<OutputFormat>(), Ok(OutputFormat::KeyValue));
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("html".parse::<OutputFormat>().is_err());
    }
}
