//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Instrument Dashboard - test results for surgical instruments
///
/// Summarizes pass/fail/pending test records per month: headline
/// counters, a per-day series, and a per-instrument breakdown.
///
/// Examples:
///   instrument-dashboard
///   instrument-dashboard --year 2026 --month 1
///   instrument-dashboard --records results.json --format json -o view.json
///   instrument-dashboard --add "Potts Scissors,failed,2026-02-14"
///   instrument-dashboard --sample --seed 7
///   instrument-dashboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// JSON file with test records
    ///
    /// An array of {id, instrument, status, date} objects. When omitted,
    /// the built-in demo records are used.
    #[arg(short, long, value_name = "FILE", env = "INSTRUMENT_DASHBOARD_RECORDS")]
    pub records: Option<PathBuf>,

    /// Year to show
    #[arg(short, long, value_name = "YEAR")]
    pub year: Option<i32>,

    /// Month to show (1 = January)
    #[arg(short, long, value_name = "MONTH")]
    pub month: Option<u32>,

    /// Record an extra test result
    ///
    /// Format: INSTRUMENT,STATUS[,DATE] where STATUS is passed, failed or
    /// pending and DATE is YYYY-MM-DD (defaults to today). Repeatable.
    #[arg(short, long = "add", value_name = "RESULT")]
    pub add: Vec<String>,

    /// Replace the records with randomly generated sample data
    #[arg(long, conflicts_with = "records")]
    pub sample: bool,

    /// Seed for --sample, for reproducible output
    #[arg(long, value_name = "SEED", requires = "sample")]
    pub seed: Option<u64>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .instrument-dashboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Leave the instrument catalog out of the report
    #[arg(long)]
    pub no_catalog: bool,

    /// chrono format string for per-day labels (e.g. "%Y-%m-%d")
    #[arg(long, value_name = "FMT")]
    pub date_format: Option<String>,

    /// Exit with code 2 if the month's pass rate is below this percentage
    #[arg(long, value_name = "PCT")]
    pub fail_below: Option<u32>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .instrument-dashboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(format!("Month must be between 1 and 12, got {}", month));
            }
        }

        if let Some(rate) = self.fail_below {
            if rate > 100 {
                return Err("Fail-below threshold must be between 0 and 100".to_string());
            }
        }

        if let Some(ref fmt) = self.date_format {
            if fmt.trim().is_empty() {
                return Err("Date format must not be empty".to_string());
            }
            if !crate::analysis::is_valid_date_format(fmt) {
                return Err(format!("Invalid date format: {}", fmt));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref records) = self.records {
            if !records.is_file() {
                return Err(format!("Records file does not exist: {}", records.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is `[general] verbose` from the config file;
    /// `--quiet` still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            records: None,
            year: None,
            month: None,
            add: Vec::new(),
            sample: false,
            seed: None,
            format: None,
            output: None,
            config: None,
            no_catalog: false,
            date_format: None,
            fail_below: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = Args::try_parse_from([
            "instrument-dashboard",
            "--year",
            "2026",
            "--month",
            "1",
            "--add",
            "Knife,passed",
            "--add",
            "Potts Scissors,failed,2026-01-04",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.year, Some(2026));
        assert_eq!(args.month, Some(1));
        assert_eq!(args.add.len(), 2);
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_seed_requires_sample() {
        assert!(Args::try_parse_from(["instrument-dashboard", "--seed", "3"]).is_err());
        assert!(Args::try_parse_from(["instrument-dashboard", "--sample", "--seed", "3"]).is_ok());
    }

    #[test]
    fn test_validation_month_range() {
        let mut args = make_args();
        args.month = Some(0);
        assert!(args.validate().is_err());

        args.month = Some(13);
        assert!(args.validate().is_err());

        args.month = Some(12);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_fail_below() {
        let mut args = make_args();
        args.fail_below = Some(101);
        assert!(args.validate().is_err());

        args.fail_below = Some(80);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_missing_records_file() {
        let mut args = make_args();
        args.records = Some(PathBuf::from("/nonexistent/records.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_date_format() {
        let args = Args::try_parse_from(["instrument-dashboard", "--date-format", "%Q"]).unwrap();
        assert!(args.validate().is_err());

        let args = Args::try_parse_from(["instrument-dashboard", "--date-format", "%Y-%"]).unwrap();
        assert!(args.validate().is_err());

        let args = Args::try_parse_from(["instrument-dashboard", "--date-format", "%d.%m."]).unwrap();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_log_level_from_config() {
        let mut args = make_args();
        assert_eq!(args.log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.log_level(true), tracing::Level::ERROR);
    }
}
