//! Instrument Dashboard - surgical instrument test tracking
//!
//! A CLI that aggregates instrument test records for one calendar month
//! and renders the dashboard as Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, unreadable records, invalid arguments)
//!   2 - Pass rate below the --fail-below threshold

mod analysis;
mod catalog;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod sample;
mod store;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{FilterWindow, NewResult, Report, ReportMetadata};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;
use store::DashboardStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so `[general] verbose` can set the level
    let (config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    debug!("instrument-dashboard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    match run(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: write a default configuration file.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so the report on stdout stays clean.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Build the store, aggregate the selected month, and emit the report.
/// Returns exit code (0 or 2).
fn run(args: Args, mut config: Config) -> Result<i32> {
    config.merge_with_args(&args);
    config.validate()?;

    let (mut store, source) = build_store(&args)?;

    let today = Local::now().date_naive();
    for spec in &args.add {
        let new = NewResult::parse_with_default_date(spec, today)
            .with_context(|| format!("Invalid --add value: {}", spec))?;
        if store.track_instrument(&new.instrument) {
            warn!("'{}' is not in the instrument catalog, tracking it", new.instrument);
        } else if let Some(info) = store.catalog().metadata(&new.instrument) {
            debug!("{} ({}): {}", new.instrument, info.category, info.description);
        }
        let added = store.add_result(new);
        info!("Recorded test #{}: {} {}", added.id, added.instrument, added.status);
    }

    let window = FilterWindow::from_calendar_month(config.dashboard.year, config.dashboard.month)
        .with_context(|| format!("Invalid month: {}", config.dashboard.month))?;
    info!("Aggregating {} records for {}", store.results().len(), window);

    let dashboard = analysis::aggregate(store.results(), window, &config.dashboard.date_format);
    let summary = dashboard.summary;

    let report = Report {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            source,
            instruments_tracked: store.instruments().len(),
            total_results: store.results().len(),
        },
        catalog: (config.report.include_catalog && !store.catalog().is_empty())
            .then(|| store.catalog().categories()),
        dashboard,
    };

    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write report to stdout")?;
        }
    }

    info!(
        "{}: {} tested, {} passed, {} failed, {}% pass rate",
        window, summary.total, summary.passed, summary.failed, summary.pass_rate
    );

    // Check --fail-below threshold
    if let Some(threshold) = args.fail_below {
        if analysis::below_threshold(&summary, threshold) {
            eprintln!(
                "\n⛔ Pass rate {}% is below {}%. Failing (exit code 2).",
                summary.pass_rate, threshold
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Create the store from sample data, a records file, or the demo records.
/// Returns the store and a description of where its records came from.
fn build_store(args: &Args) -> Result<(DashboardStore, String)> {
    if args.sample {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut store = DashboardStore::default();
        store.replace_results(sample::generate(
            &mut rng,
            sample::SAMPLE_COUNT,
            sample::SAMPLE_START_ID,
        ));
        info!("Generated {} sample test results", store.results().len());
        return Ok((store, "sample data".to_string()));
    }

    if let Some(ref path) = args.records {
        let mut store = DashboardStore::default();
        store.load_results(path)?;
        return Ok((store, path.display().to_string()));
    }

    debug!("No records file given, using demo data");
    Ok((DashboardStore::with_demo_data(), "demo data".to_string()))
}

/// Where the configuration came from. Logged once the subscriber is up.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Fallback(anyhow::Error),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            Self::Explicit(path) => info!("Loaded config from: {}", path.display()),
            Self::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            Self::Builtin => debug!("No config file found, using defaults"),
            Self::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` that fails is an error; a broken default file
/// only falls back to the built-in settings.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Builtin)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Fallback(e))),
    }
}
