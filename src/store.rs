//! In-memory dashboard state.
//!
//! The store owns the instrument catalog, the list of tracked instruments,
//! and the insertion-ordered test records for one run.

use crate::catalog::InstrumentCatalog;
use crate::error::DashboardError;
use crate::models::{NewResult, TestResult, TestStatus};
use chrono::NaiveDate;
use std::path::Path;
use tracing::{debug, info};

/// Root-owned dashboard state.
#[derive(Debug, Clone)]
pub struct DashboardStore {
    catalog: InstrumentCatalog,
    instruments: Vec<String>,
    results: Vec<TestResult>,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new(InstrumentCatalog::default())
    }
}

impl DashboardStore {
    /// Create an empty store tracking every catalog instrument.
    pub fn new(catalog: InstrumentCatalog) -> Self {
        let instruments = catalog.instruments();
        Self {
            catalog,
            instruments,
            results: Vec::new(),
        }
    }

    /// Create a store seeded with the built-in demo records.
    pub fn with_demo_data() -> Self {
        let mut store = Self::default();
        store.results = demo_results();
        store
    }

    pub fn catalog(&self) -> &InstrumentCatalog {
        &self.catalog
    }

    pub fn instruments(&self) -> &[String] {
        &self.instruments
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Start tracking an additional instrument.
    pub fn add_instrument(&mut self, label: impl Into<String>) {
        self.instruments.push(label.into());
    }

    /// Track `label` if neither the catalog nor the tracked list knows it.
    ///
    /// Returns true when the label was added.
    pub fn track_instrument(&mut self, label: &str) -> bool {
        if self.catalog.is_known(label) || self.instruments.iter().any(|i| i == label) {
            return false;
        }
        self.add_instrument(label);
        true
    }

    /// Append a record, assigning the next free id.
    pub fn add_result(&mut self, new: NewResult) -> &TestResult {
        let id = self.next_id();
        debug!("Adding test result #{} for {}", id, new.instrument);

        self.results.push(TestResult {
            id,
            instrument: new.instrument,
            status: new.status,
            date: Some(new.date),
        });

        &self.results[self.results.len() - 1]
    }

    /// Replace the whole record set.
    pub fn replace_results(&mut self, results: Vec<TestResult>) {
        debug!("Replacing {} test results with {}", self.results.len(), results.len());
        self.results = results;
    }

    /// One past the highest id in use, or 1 for an empty store.
    pub fn next_id(&self) -> u64 {
        self.results.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
    }

    /// Replace the record set with the contents of a JSON file.
    pub fn load_results(&mut self, path: &Path) -> Result<usize, DashboardError> {
        let results = read_results(path)?;
        let count = results.len();
        info!("Loaded {} test results from {}", count, path.display());
        self.replace_results(results);
        Ok(count)
    }
}

/// Read a JSON array of test records.
pub fn read_results(path: &Path) -> Result<Vec<TestResult>, DashboardError> {
    let content = std::fs::read_to_string(path).map_err(|source| DashboardError::ReadRecords {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| DashboardError::ParseRecords {
        path: path.to_path_buf(),
        source,
    })
}

/// Demo records for January and February 2026.
fn demo_results() -> Vec<TestResult> {
    use TestStatus::{Failed, Passed};

    const CAUTERY: &str = "Cautery Instruments";
    const NEEDLE: &str = "Needle Drivers & Others";
    const FORCEPS: &str = "Forceps and Retractors";
    const SCISSORS: &str = "Specialty Scissors";
    const COUNTER: &str = "Frequency Counter";

    let rows: &[(&str, TestStatus, u32, u32)] = &[
        (CAUTERY, Passed, 2, 1),
        (NEEDLE, Failed, 2, 1),
        (FORCEPS, Passed, 2, 1),
        (SCISSORS, Passed, 2, 1),
        (COUNTER, Passed, 2, 1),
        (CAUTERY, Failed, 2, 3),
        (NEEDLE, Passed, 2, 3),
        (FORCEPS, Passed, 2, 3),
        (SCISSORS, Failed, 2, 3),
        (COUNTER, Passed, 2, 3),
        (CAUTERY, Passed, 2, 5),
        (NEEDLE, Passed, 2, 5),
        (FORCEPS, Failed, 2, 5),
        (SCISSORS, Passed, 2, 5),
        (COUNTER, Failed, 2, 5),
        (CAUTERY, Passed, 2, 8),
        (NEEDLE, Failed, 2, 8),
        (FORCEPS, Passed, 2, 8),
        (SCISSORS, Passed, 2, 8),
        (COUNTER, Passed, 2, 8),
        (CAUTERY, Failed, 2, 10),
        (NEEDLE, Passed, 2, 10),
        (FORCEPS, Passed, 2, 10),
        (SCISSORS, Failed, 2, 10),
        (CAUTERY, Passed, 1, 15),
        (NEEDLE, Passed, 1, 15),
        (FORCEPS, Failed, 1, 15),
        (SCISSORS, Passed, 1, 15),
        (CAUTERY, Passed, 1, 20),
        (NEEDLE, Failed, 1, 20),
        (FORCEPS, Passed, 1, 20),
    ];

    rows.iter()
        .zip(1u64..)
        .map(|(&(instrument, status, month, day), id)| TestResult {
            id,
            instrument: instrument.to_string(),
            status,
            date: NaiveDate::from_ymd_opt(2026, month, day),
        })
        .collect()
}
