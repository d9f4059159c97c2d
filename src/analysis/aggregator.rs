//! Test-result aggregation and statistics.
//!
//! This module turns a flat list of test records and a filter window into
//! the summary counters, per-instrument breakdown, and per-day series the
//! dashboard renders. Every function here is pure.

use crate::models::{
    percent, DailyBucket, DashboardView, FilterWindow, InstrumentStats, Summary, TestResult,
    TestStatus,
};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Default day label, the US short date (`2/1/2026`).
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// True if `fmt` is a non-empty chrono format string with no unknown specifiers.
pub fn is_valid_date_format(fmt: &str) -> bool {
    !fmt.trim().is_empty() && StrftimeItems::new(fmt).all(|item| !matches!(item, Item::Error))
}

/// Label `date` with `date_format`, falling back to ISO `YYYY-MM-DD` when
/// the format cannot be rendered.
fn day_label(date: NaiveDate, date_format: &str) -> String {
    let mut label = String::new();
    if write!(label, "{}", date.format(date_format)).is_err() {
        return date.format("%Y-%m-%d").to_string();
    }
    label
}

/// Keep the records dated inside `window`. Undated records are dropped.
pub fn in_window<'a, I>(records: I, window: FilterWindow) -> Vec<&'a TestResult>
where
    I: IntoIterator<Item = &'a TestResult>,
{
    records
        .into_iter()
        .filter(|r| r.date.is_some_and(|d| window.contains(d)))
        .collect()
}

/// Compute the headline counters. Pending records count toward `total` only.
pub fn summarize(records: &[&TestResult]) -> Summary {
    let mut summary = Summary {
        total: records.len(),
        ..Summary::default()
    };

    for record in records {
        match record.status {
            TestStatus::Passed => summary.passed += 1,
            TestStatus::Failed => summary.failed += 1,
            TestStatus::Pending => {}
        }
    }

    summary.pass_rate = percent(summary.passed, summary.total).unwrap_or(0);
    summary
}

/// Group records by instrument label. Anything not passed counts as failed.
pub fn group_by_instrument(records: &[&TestResult]) -> BTreeMap<String, InstrumentStats> {
    let mut grouped: BTreeMap<String, InstrumentStats> = BTreeMap::new();

    for record in records {
        let stats = grouped.entry(record.instrument.clone()).or_default();
        stats.total += 1;
        if record.is_passed() {
            stats.passed += 1;
        } else {
            stats.failed += 1;
        }
    }

    grouped
}

/// Group records by calendar day, ordered chronologically.
///
/// Buckets are keyed and sorted by the date itself; `date_format` only
/// shapes the label, so a month-first label still sorts 2/3 before 2/10.
/// Undated records are skipped.
pub fn daily_series(records: &[&TestResult], date_format: &str) -> Vec<DailyBucket> {
    let mut days: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();

    for record in records {
        let Some(date) = record.date else {
            continue;
        };
        let counts = days.entry(date).or_default();
        if record.is_passed() {
            counts.0 += 1;
        } else {
            counts.1 += 1;
        }
    }

    days.into_iter()
        .map(|(date, (passed, failed))| DailyBucket {
            date,
            label: day_label(date, date_format),
            passed,
            failed,
        })
        .collect()
}

/// Build the complete dashboard view for one window.
pub fn aggregate(records: &[TestResult], window: FilterWindow, date_format: &str) -> DashboardView {
    let filtered = in_window(records, window);

    DashboardView {
        window,
        summary: summarize(&filtered),
        by_instrument: group_by_instrument(&filtered),
        daily: daily_series(&filtered, date_format),
    }
}

/// True if the window had records and its pass rate is under `threshold`.
///
/// An empty window never falls below: its 0% is a display default.
pub fn below_threshold(summary: &Summary, threshold: u32) -> bool {
    summary.total > 0 && summary.pass_rate < threshold
}

/// Instruments ranked by failure count, worst first, ties broken by label.
pub fn most_failing_instruments(
    by_instrument: &BTreeMap<String, InstrumentStats>,
    n: usize,
) -> Vec<(&str, InstrumentStats)> {
    let mut ranked: Vec<_> = by_instrument
        .iter()
        .filter(|(_, stats)| stats.failed > 0)
        .map(|(name, stats)| (name.as_str(), *stats))
        .collect();

    ranked.sort_by_key(|(_, stats)| std::cmp::Reverse(stats.failed));
    ranked.truncate(n);

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(id: u64, instrument: &str, status: TestStatus, on: Option<NaiveDate>) -> TestResult {
        TestResult {
            id,
            instrument: instrument.to_string(),
            status,
            date: on,
        }
    }

    fn february() -> FilterWindow {
        FilterWindow::new(2026, 1)
    }

    fn mixed_records() -> Vec<TestResult> {
        vec![
            record(1, "A", TestStatus::Passed, Some(date(2026, 2, 1))),
            record(2, "A", TestStatus::Failed, Some(date(2026, 2, 1))),
            record(3, "B", TestStatus::Pending, Some(date(2026, 2, 3))),
            record(4, "B", TestStatus::Passed, Some(date(2026, 2, 10))),
            record(5, "C", TestStatus::Failed, Some(date(2026, 2, 10))),
            record(6, "C", TestStatus::Pending, None),
            record(7, "A", TestStatus::Passed, Some(date(2026, 1, 31))),
            record(8, "D", TestStatus::Passed, Some(date(2025, 2, 1))),
        ]
    }

    #[test]
    fn test_concrete_february_scenario() {
        let records = vec![
            record(1, "A", TestStatus::Passed, Some(date(2026, 2, 1))),
            record(2, "A", TestStatus::Failed, Some(date(2026, 2, 1))),
            record(3, "B", TestStatus::Passed, Some(date(2026, 1, 1))),
        ];

        let view = aggregate(&records, february(), "%Y-%m-%d");

        assert_eq!(
            view.summary,
            Summary {
                total: 2,
                passed: 1,
                failed: 1,
                pass_rate: 50
            }
        );
        assert_eq!(view.by_instrument.len(), 1);
        assert_eq!(
            view.by_instrument.get("A"),
            Some(&InstrumentStats {
                passed: 1,
                failed: 1,
                total: 2
            })
        );
        assert!(!view.by_instrument.contains_key("B"));
        assert_eq!(view.daily.len(), 1);
        assert_eq!(view.daily[0].label, "2026-02-01");
        assert_eq!(view.daily[0].passed, 1);
        assert_eq!(view.daily[0].failed, 1);
    }

    #[test]
    fn test_undated_record_is_ignored() {
        let mut records = vec![record(1, "A", TestStatus::Passed, Some(date(2026, 2, 1)))];
        let before = aggregate(&records, february(), DEFAULT_DATE_FORMAT);

        records.push(record(2, "Z", TestStatus::Failed, None));
        let after = aggregate(&records, february(), DEFAULT_DATE_FORMAT);

        assert_eq!(before, after);
        assert_eq!(after.summary.total, 1);
        assert!(!after.by_instrument.contains_key("Z"));
    }

    #[test]
    fn test_empty_month() {
        let view = aggregate(&mixed_records(), FilterWindow::new(2026, 6), DEFAULT_DATE_FORMAT);

        assert_eq!(view.summary, Summary::default());
        assert_eq!(view.summary.pass_rate, 0);
        assert!(view.by_instrument.is_empty());
        assert!(view.daily.is_empty());
    }

    #[test]
    fn test_pending_counts_in_total_only() {
        let view = aggregate(&mixed_records(), february(), DEFAULT_DATE_FORMAT);
        let summary = view.summary;

        assert_eq!(summary.total, 5);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.pending(), 1);
        assert_eq!(summary.passed + summary.failed + summary.pending(), summary.total);
        assert_eq!(summary.pass_rate, 40);
    }

    #[test]
    fn test_pending_folds_into_failed_per_instrument() {
        let view = aggregate(&mixed_records(), february(), DEFAULT_DATE_FORMAT);

        let b = view.by_instrument["B"];
        assert_eq!(b.passed, 1);
        assert_eq!(b.failed, 1);
        assert_eq!(b.total, 2);

        for stats in view.by_instrument.values() {
            assert_eq!(stats.passed + stats.failed, stats.total);
        }
    }

    #[test]
    fn test_instrument_totals_match_summary() {
        let records = mixed_records();
        for month in 0..12 {
            let view = aggregate(&records, FilterWindow::new(2026, month), DEFAULT_DATE_FORMAT);
            let sum: usize = view.by_instrument.values().map(|s| s.total).sum();
            assert_eq!(sum, view.summary.total);
            if view.summary.total == 0 {
                assert_eq!(view.summary.pass_rate, 0);
            }
        }
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = mixed_records();
        let first = aggregate(&records, february(), DEFAULT_DATE_FORMAT);

        let filtered: Vec<TestResult> =
            in_window(&records, february()).into_iter().cloned().collect();
        let second = aggregate(&filtered, february(), DEFAULT_DATE_FORMAT);

        assert_eq!(first, second);
    }

    #[test]
    fn test_daily_series_is_chronological() {
        let view = aggregate(&mixed_records(), february(), DEFAULT_DATE_FORMAT);
        let labels: Vec<&str> = view.daily.iter().map(|b| b.label.as_str()).collect();

        // Lexicographic order would put 2/10/2026 before 2/3/2026.
        assert_eq!(labels, vec!["2/1/2026", "2/3/2026", "2/10/2026"]);

        let pending_day = &view.daily[1];
        assert_eq!(pending_day.passed, 0);
        assert_eq!(pending_day.failed, 1);
    }

    #[test]
    fn test_duplicate_records_are_counted() {
        let records = vec![
            record(1, "A", TestStatus::Passed, Some(date(2026, 2, 5))),
            record(2, "A", TestStatus::Passed, Some(date(2026, 2, 5))),
        ];
        let view = aggregate(&records, february(), DEFAULT_DATE_FORMAT);

        assert_eq!(view.by_instrument["A"].total, 2);
        assert_eq!(view.daily.len(), 1);
        assert_eq!(view.daily[0].passed, 2);
    }

    #[test]
    fn test_most_failing_instruments() {
        let view = aggregate(&mixed_records(), february(), DEFAULT_DATE_FORMAT);
        let ranked = most_failing_instruments(&view.by_instrument, 2);

        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|(_, stats)| stats.failed == 1));
        assert_eq!(ranked[0].0, "A");
    }

    #[test]
    fn test_date_format_validation() {
        assert!(is_valid_date_format(DEFAULT_DATE_FORMAT));
        assert!(is_valid_date_format("%Y-%m-%d"));
        assert!(is_valid_date_format("%b %e"));
        assert!(!is_valid_date_format("%Q"));
        assert!(!is_valid_date_format("%Y-%"));
        assert!(!is_valid_date_format("  "));
    }

    #[test]
    fn test_unrenderable_format_falls_back_to_iso() {
        let view = aggregate(&mixed_records(), february(), "%Q");
        let labels: Vec<&str> = view.daily.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2026-02-01", "2026-02-03", "2026-02-10"]);
    }

    #[test]
    fn test_below_threshold() {
        let empty = Summary::default();
        assert!(!below_threshold(&empty, 80));

        let summary = Summary {
            total: 10,
            passed: 8,
            failed: 2,
            pass_rate: 80,
        };
        assert!(!below_threshold(&summary, 80));
        assert!(below_threshold(&summary, 81));
        assert!(!below_threshold(&summary, 0));
    }
}
