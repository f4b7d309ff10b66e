#![warn(missing_docs)]
//! logagg CLI Library
//!
//! Command-line front end of the aggregation pipeline. `main` only calls
//! [`run`]; tests and embedders can build a [`Cli`] and call
//! [`run_with_cli`] directly.
//!
//! # Example
//!
//! ```text
//! logagg --key-column 0 --value-column 2 stat.log            # stats table
//! logagg --where 1=read --format kv --label read stat.log    # readcount, readmean, ...
//! logagg --numeric-key --bucket-width 1000 stat.log cdf --per-group-dir cdfs/
//! ```
//!
//! Delimited tables are byte-identical across runs over the same input and
//! flags. JSON reports are not: they carry a generation timestamp.

mod config;
mod executor;
mod planner;

pub use config::*;
pub use executor::{
    build_report, compute_cdfs, compute_overall, compute_statistics, execute_plan,
    format_human_output, format_human_summary,
};
pub use planner::{
    AggregationPlan, CdfSettings, OutputSettings, PlanOptions, build_plan, parse_column_pair,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use logagg_report::{
    Delimiter, OutputFormat, Row, cdf_rows, file_in_dir, generate_json_report, keyed_cdf_rows,
    labeled_rows, run_summary_rows, stats_rows, write_rows, write_rows_to, write_text,
};
use logagg_stats::MedianPolicy;
use rayon::ThreadPoolBuilder;
use std::path::{Path, PathBuf};

/// logagg CLI arguments
#[derive(Parser, Debug)]
#[command(name = "logagg")]
#[command(author, version, about = "logagg - group-by statistics over columnar log files")]
pub struct Cli {
    /// Optional subcommand (Stats, Cdf, Summary, Init); defaults to Stats
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log file, or directory of log files
    pub input: Option<PathBuf>,

    /// Column holding the grouping key (0-based)
    #[arg(long, short = 'k')]
    pub key_column: Option<usize>,

    /// Column holding the numeric value (0-based)
    #[arg(long, short = 'c')]
    pub value_column: Option<usize>,

    /// Parse keys as numbers so they sort numerically
    #[arg(long)]
    pub numeric_key: bool,

    /// Bucket numeric keys into windows of this width (implies --numeric-key)
    #[arg(long)]
    pub bucket_width: Option<f64>,

    /// Only keep lines whose column equals a value: COL=VALUE (repeatable)
    #[arg(long = "where", value_name = "COL=VALUE", value_parser = parse_column_pair)]
    pub column_equals: Vec<(usize, String)>,

    /// Only keep lines whose column matches a regex: COL=REGEX (repeatable)
    #[arg(long = "match", value_name = "COL=REGEX", value_parser = parse_column_pair)]
    pub column_matches: Vec<(usize, String)>,

    /// Only keep lines for which the expression holds, e.g. "c1 == \"read\" && c3 > 100"
    #[arg(long)]
    pub filter: Option<String>,

    /// Percentile rank to report after the median (repeatable)
    #[arg(long = "percentile", short = 'p')]
    pub percentiles: Vec<f64>,

    /// Median convention: lower-middle or interpolated
    #[arg(long)]
    pub median: Option<MedianPolicy>,

    /// Key that always gets a row, with -1 statistics when it has no samples (repeatable)
    #[arg(long = "expect-key")]
    pub expected_keys: Vec<String>,

    /// Fraction of each group's leading samples to drop
    #[arg(long)]
    pub trim_initial: Option<f64>,

    /// Fraction of each group's samples to keep up to
    #[arg(long)]
    pub trim_final: Option<f64>,

    /// Thin each CDF to about this many rows
    #[arg(long)]
    pub cdf_max_points: Option<usize>,

    /// Field delimiter: tab or space
    #[arg(long)]
    pub delimiter: Option<Delimiter>,

    /// Emit a header row on the statistics table
    #[arg(long)]
    pub header: bool,

    /// Leading lines of every input file to ignore
    #[arg(long)]
    pub skip_header: Option<usize>,

    /// When the input is a directory, only read files whose name matches
    #[arg(long)]
    pub pattern: Option<String>,

    /// Output format: table, json, human, kv (json output carries a timestamp)
    #[arg(long)]
    pub format: Option<String>,

    /// Prefix of labeled key/value rows
    #[arg(long)]
    pub label: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append to the output file instead of replacing it
    #[arg(long)]
    pub append: bool,

    /// Configuration file (default: nearest logagg.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of threads for parallel statistics computation
    /// 0 = use all available cores (default), 1 = single-threaded
    #[arg(long, short = 'j', default_value = "0")]
    pub threads: usize,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Per-group statistics table (default)
    Stats,
    /// CDF table of every group
    Cdf {
        /// Write one `<key>.txt` file per group into this directory; keys that
        /// are not plain file names are skipped
        #[arg(long)]
        per_group_dir: Option<PathBuf>,
    },
    /// Statistics over all accepted samples plus run counters
    Summary,
    /// Print a default logagg.toml
    Init,
}

/// Run the logagg CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the logagg CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Logs go to stderr so tables on stdout stay clean. A second call in the
    // same process keeps the first subscriber.
    let filter = if cli.verbose {
        "logagg=debug"
    } else {
        "logagg=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if matches!(cli.command, Some(Commands::Init)) {
        print!("{}", LogaggConfig::default_toml());
        return Ok(());
    }

    // Configure Rayon thread pool for statistics computation
    if cli.threads > 0 {
        ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .ok();
    }

    let config = match &cli.config {
        Some(path) => LogaggConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LogaggConfig::discover().unwrap_or_default(),
    };

    let options = plan_options(&cli)?;
    let plan = build_plan(&options, &config)?;

    match &cli.command {
        Some(Commands::Cdf { per_group_dir }) => run_cdf(&plan, per_group_dir.as_deref()),
        Some(Commands::Summary) => run_summary(&plan),
        Some(Commands::Stats) | None => run_stats(&plan),
        Some(Commands::Init) => Ok(()),
    }
}

fn plan_options(cli: &Cli) -> anyhow::Result<PlanOptions> {
    let input = cli
        .input
        .clone()
        .context("an input file or directory is required")?;
    Ok(PlanOptions {
        input,
        key_column: cli.key_column,
        value_column: cli.value_column,
        numeric_key: cli.numeric_key,
        bucket_width: cli.bucket_width,
        column_equals: cli.column_equals.clone(),
        column_matches: cli.column_matches.clone(),
        filter: cli.filter.clone(),
        percentiles: cli.percentiles.clone(),
        median: cli.median,
        expected_keys: cli.expected_keys.clone(),
        trim_initial: cli.trim_initial,
        trim_final: cli.trim_final,
        cdf_max_points: cli.cdf_max_points,
        delimiter: cli.delimiter,
        header: cli.header,
        skip_header: cli.skip_header,
        pattern: cli.pattern.clone(),
        format: cli.format.clone(),
        output: cli.output.clone(),
        append: cli.append,
        label: cli.label.clone(),
    })
}

fn run_stats(plan: &AggregationPlan) -> anyhow::Result<()> {
    let grouped = execute_plan(plan)?;
    let table = compute_statistics(&grouped, &plan.table)?;
    let out = &plan.output;

    match out.format {
        OutputFormat::Table => emit_rows(
            out,
            &stats_rows(&table, &plan.table.stats, out.header),
        ),
        OutputFormat::KeyValue => {
            let rows: Vec<Row> = table
                .rows
                .iter()
                .flat_map(|row| labeled_rows(&format!("{}{}", out.label, row.key), &row.summary))
                .collect();
            emit_rows(out, &rows)
        }
        OutputFormat::Json => {
            let report = build_report(plan, table, grouped.stats);
            let json = generate_json_report(&report)?;
            emit_text(out, &format!("{}\n", json))
        }
        OutputFormat::Human => emit_text(
            out,
            &format_human_output(&table, &plan.table.stats, &grouped.stats),
        ),
    }
}

fn run_cdf(plan: &AggregationPlan, per_group_dir: Option<&Path>) -> anyhow::Result<()> {
    let grouped = execute_plan(plan)?;
    let cdfs = compute_cdfs(&grouped, &plan.cdf, &plan.table.trim);
    let out = &plan.output;

    if let Some(dir) = per_group_dir {
        let mut rejected = 0;
        for (key, points) in &cdfs {
            // Keys come from log content and must not leave `dir`
            let Some(path) = file_in_dir(dir, &format!("{}.txt", key)) else {
                rejected += 1;
                tracing::warn!(key = %key, "key is not a plain file name, cdf not written");
                continue;
            };
            write_rows(&path, &cdf_rows(points), out.delimiter, out.mode)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        tracing::info!(
            groups = cdfs.len() - rejected,
            rejected,
            dir = %dir.display(),
            "cdf tables written"
        );
        return Ok(());
    }

    let rows = keyed_cdf_rows(cdfs.iter().map(|(key, points)| (key, points.as_slice())));
    emit_rows(out, &rows)
}

fn run_summary(plan: &AggregationPlan) -> anyhow::Result<()> {
    let grouped = execute_plan(plan)?;
    let overall = compute_overall(&grouped, &plan.table)?;
    let groups = grouped.group_count();
    let out = &plan.output;

    match out.format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "statistics": overall,
                "run": grouped.stats,
                "groups": groups,
            });
            emit_text(out, &format!("{}\n", serde_json::to_string_pretty(&value)?))
        }
        OutputFormat::Human => {
            emit_text(out, &format_human_summary(&overall, &grouped.stats, groups))
        }
        OutputFormat::Table | OutputFormat::KeyValue => {
            let mut rows = labeled_rows(&out.label, &overall);
            rows.extend(run_summary_rows(&grouped.stats, groups));
            emit_rows(out, &rows)
        }
    }
}

fn emit_rows(out: &OutputSettings, rows: &[Row]) -> anyhow::Result<()> {
    match &out.path {
        Some(path) => write_rows(path, rows, out.delimiter, out.mode)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let stdout = std::io::stdout();
            write_rows_to(&mut stdout.lock(), rows, out.delimiter)?;
            Ok(())
        }
    }
}

fn emit_text(out: &OutputSettings, text: &str) -> anyhow::Result<()> {
    match &out.path {
        Some(path) => write_text(path, text, out.mode)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::parse_from([
            "logagg",
            "--key-column",
            "1",
            "--value-column",
            "3",
            "--where",
            "2=read",
            "--match",
            "0=^host",
            "-p",
            "50",
            "-p",
            "99",
            "--median",
            "interpolated",
            "--delimiter",
            "space",
            "stat.log",
            "cdf",
            "--per-group-dir",
            "out",
        ]);

        assert_eq!(cli.key_column, Some(1));
        assert_eq!(cli.value_column, Some(3));
        assert_eq!(cli.column_equals, vec![(2, "read".to_string())]);
        assert_eq!(cli.column_matches, vec![(0, "^host".to_string())]);
        assert_eq!(cli.percentiles, vec![50.0, 99.0]);
        assert_eq!(cli.median, Some(MedianPolicy::Interpolated));
        assert_eq!(cli.delimiter, Some(Delimiter::Space));
        assert_eq!(cli.input, Some(PathBuf::from("stat.log")));
        assert!(matches!(
            cli.command,
            Some(Commands::Cdf { per_group_dir: Some(ref d) }) if d == Path::new("out")
        ));
    }

    #[test]
    fn test_default_command_is_stats() {
        let cli = Cli::parse_from(["logagg", "stat.log"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.threads, 0);
    }

    #[test]
    fn test_bad_pair_is_rejected() {
        assert!(Cli::try_parse_from(["logagg", "--where", "read", "stat.log"]).is_err());
    }

    #[test]
    fn test_missing_input_argument() {
        let cli = Cli::parse_from(["logagg", "stats"]);
        assert!(run_with_cli(cli).is_err());
    }
}
