//! Data models for the instrument dashboard.
//!
//! This module contains the core data structures used throughout
//! the application for representing test records, filter windows,
//! derived aggregates, and reports.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// English month names, indexed by zero-based month.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Outcome of a single instrument test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// The instrument passed its function test.
    Passed,
    /// The instrument failed its function test.
    Failed,
    /// The test has been scheduled but not concluded.
    Pending,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "passed"),
            TestStatus::Failed => write!(f, "failed"),
            TestStatus::Pending => write!(f, "pending"),
        }
    }
}

impl FromStr for TestStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "passed" | "pass" => Ok(TestStatus::Passed),
            "failed" | "fail" => Ok(TestStatus::Failed),
            "pending" => Ok(TestStatus::Pending),
            other => Err(DashboardError::UnknownStatus(other.to_string())),
        }
    }
}

/// A single observation of an instrument's test status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Unique record id.
    pub id: u64,
    /// Instrument or category label.
    pub instrument: String,
    /// Outcome of the test.
    pub status: TestStatus,
    /// Calendar date of the test. `None` when absent or unparseable.
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub date: Option<NaiveDate>,
}

impl TestResult {
    /// Returns true if the test passed.
    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// Parse a record date from either `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Accepts a date string, `null`, or any other JSON value; anything that is
/// not a parseable date string maps to `None`.
fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => parse_date(&s),
        _ => None,
    })
}

/// A record to be appended to the store; the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResult {
    pub instrument: String,
    pub status: TestStatus,
    pub date: NaiveDate,
}

impl NewResult {
    /// Parse `INSTRUMENT,STATUS[,DATE]`, using `today` when the date is omitted.
    pub fn parse_with_default_date(
        spec: &str,
        today: NaiveDate,
    ) -> Result<Self, DashboardError> {
        let parts: Vec<&str> = spec.split(',').map(str::trim).collect();

        let (instrument, status, date) = match parts.as_slice() {
            [instrument, status] => (*instrument, *status, None),
            [instrument, status, date] => (*instrument, *status, Some(*date)),
            _ => return Err(DashboardError::InvalidResultSpec(spec.to_string())),
        };

        if instrument.is_empty() {
            return Err(DashboardError::InvalidResultSpec(spec.to_string()));
        }

        let date = match date {
            Some(raw) => {
                parse_date(raw).ok_or_else(|| DashboardError::InvalidDate(raw.to_string()))?
            }
            None => today,
        };

        Ok(Self {
            instrument: instrument.to_string(),
            status: status.parse()?,
            date,
        })
    }
}

/// A calendar month selecting which records are included in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterWindow {
    /// Calendar year.
    pub year: i32,
    /// Zero-based month (0 = January).
    pub month: u32,
}

impl FilterWindow {
    /// Create a window from a zero-based month. `month` must be below 12.
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!(month < 12, "zero-based month out of range: {}", month);
        Self { year, month }
    }

    /// Create a window from a one-based month (1 = January), as typed by users.
    ///
    /// Returns `None` unless `month` is in `1..=12`.
    pub fn from_calendar_month(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then(|| Self::new(year, month - 1))
    }

    /// Returns true if `date` falls inside this calendar month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month
    }

    /// English name of the month, if the month index is valid.
    pub fn month_name(&self) -> Option<&'static str> {
        MONTH_NAMES.get(self.month as usize).copied()
    }
}

impl fmt::Display for FilterWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month_name() {
            Some(name) => write!(f, "{} {}", name, self.year),
            None => write!(f, "month {} of {}", self.month, self.year),
        }
    }
}

/// Round `100 * part / whole` half-up, or `None` when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> Option<u32> {
    if whole == 0 {
        return None;
    }
    Some(((200 * part + whole) / (2 * whole)) as u32)
}

/// Headline counters for a filter window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// All records in the window, pending included.
    pub total: usize,
    /// Records with status passed.
    pub passed: usize,
    /// Records with status failed. Pending records are not counted here.
    pub failed: usize,
    /// Rounded pass percentage, 0 when there are no records.
    pub pass_rate: u32,
}

impl Summary {
    /// Records counted in neither `passed` nor `failed`.
    pub fn pending(&self) -> usize {
        self.total
            .saturating_sub(self.passed)
            .saturating_sub(self.failed)
    }
}

/// Per-instrument pass/fail counters. Anything not passed counts as failed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentStats {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl InstrumentStats {
    /// Rounded success percentage, `None` when the group is empty.
    pub fn success_rate(&self) -> Option<u32> {
        percent(self.passed, self.total)
    }
}

/// Pass/fail counters for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// Day the bucket covers.
    pub date: NaiveDate,
    /// Display label for the day.
    pub label: String,
    pub passed: usize,
    pub failed: usize,
}

/// Everything the dashboard view renders for one filter window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub window: FilterWindow,
    pub summary: Summary,
    pub by_instrument: BTreeMap<String, InstrumentStats>,
    pub daily: Vec<DailyBucket>,
}

/// One catalog instrument, as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One catalog category and its instruments, as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryListing {
    pub name: String,
    pub instruments: Vec<CatalogEntry>,
}

/// Metadata about the dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Where the records came from (file path, demo data, sample data).
    pub source: String,
    /// Number of instruments tracked.
    pub instruments_tracked: usize,
    /// Number of test results across all dates.
    pub total_results: usize,
}

/// The complete dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// Instrument catalog, omitted when not requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<CategoryListing>>,
    /// Aggregated view for the selected window.
    pub dashboard: DashboardView,
}
