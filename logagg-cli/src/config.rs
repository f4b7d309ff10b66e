//! Configuration loading from logagg.toml
//!
//! Settings shared by a series of runs (column layout, percentiles, output
//! shape) can live in a `logagg.toml` file. The file is discovered by walking
//! up from the current directory; command-line flags override it.

use logagg_report::Delimiter;
use logagg_stats::MedianPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the discovered configuration file
pub const CONFIG_FILE_NAME: &str = "logagg.toml";

/// logagg configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LogaggConfig {
    /// Input layout
    #[serde(default)]
    pub input: InputConfig,
    /// Statistics settings
    #[serde(default)]
    pub stats: StatsSection,
    /// CDF settings
    #[serde(default)]
    pub cdf: CdfConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// How input lines are laid out
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Column holding the grouping key (0-based)
    #[serde(default)]
    pub key_column: usize,
    /// Column holding the numeric value (0-based)
    #[serde(default = "default_value_column")]
    pub value_column: usize,
    /// Parse keys as numbers
    #[serde(default)]
    pub numeric_key: bool,
    /// Bucket numeric keys into windows of this width
    #[serde(default)]
    pub bucket_width: Option<f64>,
    /// Leading lines of every file to ignore
    #[serde(default)]
    pub skip_header: usize,
    /// Only read files whose name matches this regex when the input is a directory
    #[serde(default)]
    pub pattern: Option<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            key_column: 0,
            value_column: default_value_column(),
            numeric_key: false,
            bucket_width: None,
            skip_header: 0,
            pattern: None,
        }
    }
}

fn default_value_column() -> usize {
    1
}

/// Statistics settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsSection {
    /// Percentile ranks reported after the median
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
    /// Median convention: "lower-middle" or "interpolated"
    #[serde(default)]
    pub median: MedianPolicy,
    /// Keys that always get a row (sentinel statistics when empty)
    #[serde(default)]
    pub expected_keys: Vec<String>,
    /// Fraction of each group's leading samples to drop
    #[serde(default)]
    pub trim_initial: f64,
    /// Fraction of each group's samples to keep up to
    #[serde(default = "default_trim_final")]
    pub trim_final: f64,
}

impl Default for StatsSection {
    fn default() -> Self {
        Self {
            percentiles: default_percentiles(),
            median: MedianPolicy::default(),
            expected_keys: Vec::new(),
            trim_initial: 0.0,
            trim_final: default_trim_final(),
        }
    }
}

fn default_percentiles() -> Vec<f64> {
    vec![logagg_stats::DEFAULT_PERCENTILE]
}
fn default_trim_final() -> f64 {
    1.0
}

/// CDF settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CdfConfig {
    /// Thin each CDF to about this many rows (unset keeps every row)
    #[serde(default)]
    pub max_points: Option<usize>,
    /// Seed of the thinning sampler
    #[serde(default)]
    pub seed: u64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Default output format: "table", "json", "human", "kv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Field delimiter: "tab" or "space"
    #[serde(default)]
    pub delimiter: Delimiter,
    /// Emit a header row on the statistics table
    #[serde(default)]
    pub header: bool,
    /// Prefix of labeled key/value rows
    #[serde(default)]
    pub label: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            delimiter: Delimiter::default(),
            header: false,
            label: String::new(),
        }
    }
}

fn default_format() -> String {
    "table".to_string()
}

impl LogaggConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path of the nearest `logagg.toml`, walking up from `start`
    pub fn find_from(start: impl AsRef<Path>) -> Option<PathBuf> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::load(Self::find_from(dir)?).ok()
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# logagg configuration

[input]
# Column holding the grouping key (0-based)
key_column = 0
# Column holding the numeric value (0-based)
value_column = 1
# Parse keys as numbers (sorts numerically)
numeric_key = false
# Bucket numeric keys into windows of this width (uncomment to enable)
# bucket_width = 1000.0
# Leading lines of every file to ignore
skip_header = 0
# Only read matching files when the input is a directory (uncomment to enable)
# pattern = "^stat\\."

[stats]
# Percentile ranks reported after the median
percentiles = [90.0]
# Median convention: "lower-middle" or "interpolated"
median = "lower-middle"
# Keys that always get a row, with -1 statistics when no sample matched
expected_keys = []
# Drop a leading/trailing fraction of each group's samples
trim_initial = 0.0
trim_final = 1.0

[cdf]
# Thin each CDF to about this many rows (uncomment to enable)
# max_points = 10000
# Seed of the thinning sampler
seed = 0

[output]
# Default output format: table, json, human, kv
format = "table"
# Field delimiter: tab or space
delimiter = "tab"
# Emit a header row on the statistics table
header = false
# Prefix of labeled key/value rows
label = ""
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogaggConfig::default();
        assert_eq!(config.input.key_column, 0);
        assert_eq!(config.input.value_column, 1);
        assert_eq!(config.stats.percentiles, vec![90.0]);
        assert_eq!(config.stats.median, MedianPolicy::LowerMiddle);
        assert_eq!(config.output.delimiter, Delimiter::Tab);
        assert!(config.cdf.max_points.is_none());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [input]
            key_column = 2
            value_column = 5

            [stats]
            percentiles = [50.0, 99.0]
            median = "interpolated"

            [output]
            delimiter = "space"
        "#;

        let config: LogaggConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.input.key_column, 2);
        assert_eq!(config.input.value_column, 5);
        assert_eq!(config.stats.percentiles, vec![50.0, 99.0]);
        assert_eq!(config.stats.median, MedianPolicy::Interpolated);
        assert_eq!(config.output.delimiter, Delimiter::Space);
        // Defaults should still apply
        assert_eq!(config.output.format, "table");
        assert_eq!(config.stats.trim_final, 1.0);
    }

    #[test]
    fn test_default_toml_parses() {
        let config: LogaggConfig = toml::from_str(&LogaggConfig::default_toml()).unwrap();
        assert_eq!(config, LogaggConfig::default());
    }

    #[test]
    fn test_find_walks_up() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[input]\nkey_column = 3\n").unwrap();

        let found = LogaggConfig::find_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(LogaggConfig::load(&found).unwrap().input.key_column, 3);
    }
}
