//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.instrument-dashboard.toml` files.

use crate::analysis::DEFAULT_DATE_FORMAT;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".instrument-dashboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dashboard view settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Write the report here instead of stdout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Which month to show and how to label days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Default year.
    #[serde(default = "default_year")]
    pub year: i32,

    /// Default month, 1 = January.
    #[serde(default = "default_month")]
    pub month: u32,

    /// chrono format string for per-day labels.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            month: default_month(),
            date_format: default_date_format(),
        }
    }
}

fn default_year() -> i32 {
    2026
}

fn default_month() -> u32 {
    2
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the instrument catalog section.
    #[serde(default = "default_true")]
    pub include_catalog: bool,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_catalog: true,
            format: OutputFormat::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Reject values the dashboard cannot render.
    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.dashboard.month) {
            anyhow::bail!(
                "dashboard.month must be between 1 and 12, got {}",
                self.dashboard.month
            );
        }
        if self.dashboard.date_format.trim().is_empty() {
            anyhow::bail!("dashboard.date_format must not be empty");
        }
        if !crate::analysis::is_valid_date_format(&self.dashboard.date_format) {
            anyhow::bail!(
                "dashboard.date_format is not a valid strftime format: {}",
                self.dashboard.date_format
            );
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(year) = args.year {
            self.dashboard.year = year;
        }
        if let Some(month) = args.month {
            self.dashboard.month = month;
        }
        if let Some(ref date_format) = args.date_format {
            self.dashboard.date_format = date_format.clone();
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if args.no_catalog {
            self.report.include_catalog = false;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
