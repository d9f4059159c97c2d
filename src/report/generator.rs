//! Markdown and JSON dashboard reports.
//!
//! This module renders the home summary, instrument catalog, and
//! monthly dashboard view for display in a terminal or a file.

use crate::analysis::most_failing_instruments;
use crate::models::{CategoryListing, DashboardView, Report, ReportMetadata, Summary};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Instrument Dashboard\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_home_section(&report.metadata));

    if let Some(ref catalog) = report.catalog {
        output.push_str(&generate_catalog_section(catalog));
    }

    output.push_str(&generate_dashboard_section(&report.dashboard));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n\n", metadata.source));

    section
}

/// Generate the quick summary shown on the home view.
fn generate_home_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Quick Summary\n\n");
    section.push_str(&format!(
        "- Instruments tracked: **{}**\n",
        metadata.instruments_tracked
    ));
    section.push_str(&format!("- Test results: **{}**\n\n", metadata.total_results));

    section
}

/// Generate the instruments-by-category section.
fn generate_catalog_section(catalog: &[CategoryListing]) -> String {
    let mut section = String::new();

    section.push_str("## Instruments by Category\n\n");

    for category in catalog {
        section.push_str(&format!(
            "### {} ({} items)\n\n",
            category.name,
            category.instruments.len()
        ));
        for instrument in &category.instruments {
            match instrument.description {
                Some(ref desc) => section.push_str(&format!("- {}: {}\n", instrument.name, desc)),
                None => section.push_str(&format!("- {}\n", instrument.name)),
            }
        }
        section.push('\n');
    }

    section
}

/// Generate the monthly dashboard section.
fn generate_dashboard_section(view: &DashboardView) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Testing Dashboard: {}\n\n", view.window));
    section.push_str(&generate_summary_cards(&view.summary));

    if view.by_instrument.is_empty() {
        section.push_str(&format!("No test data available for {}\n\n", view.window));
        return section;
    }

    section.push_str(&generate_daily_table(view));
    section.push_str(&generate_instrument_table(view));
    section.push_str(&generate_attention_list(view));

    section
}

/// Generate the four headline counters.
fn generate_summary_cards(summary: &Summary) -> String {
    let mut cards = String::new();

    cards.push_str("| Total Tested | ✓ Passed | ✗ Failed | Pass Rate |\n");
    cards.push_str("|:---:|:---:|:---:|:---:|\n");
    cards.push_str(&format!(
        "| {} | {} | {} | {}% |\n\n",
        summary.total, summary.passed, summary.failed, summary.pass_rate
    ));

    if summary.pending() > 0 {
        cards.push_str(&format!(
            "*{} pending result(s) counted in the total only.*\n\n",
            summary.pending()
        ));
    }

    cards
}

/// Generate the per-day results table.
fn generate_daily_table(view: &DashboardView) -> String {
    let mut table = String::new();

    table.push_str("### Daily Test Results\n\n");
    table.push_str("| Date | Passed | Failed |\n");
    table.push_str("|:---|:---:|:---:|\n");

    for bucket in &view.daily {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            bucket.label, bucket.passed, bucket.failed
        ));
    }
    table.push('\n');

    table
}

/// Generate the per-instrument summary table.
fn generate_instrument_table(view: &DashboardView) -> String {
    let mut table = String::new();

    table.push_str("### Instrument Test Summary\n\n");
    table.push_str("| Instrument | Total | Passed | Failed | Success Rate |\n");
    table.push_str("|:---|:---:|:---:|:---:|:---:|\n");

    for (name, stats) in &view.by_instrument {
        let rate = stats
            .success_rate()
            .map(|r| format!("{}%", r))
            .unwrap_or_default();
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            name, stats.total, stats.passed, stats.failed, rate
        ));
    }
    table.push('\n');

    table
}

/// List the instruments with the most failures.
fn generate_attention_list(view: &DashboardView) -> String {
    let failing = most_failing_instruments(&view.by_instrument, 3);
    if failing.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("### Needs Attention\n\n");
    for (name, stats) in failing {
        section.push_str(&format!("- {}: {} of {} not passed\n", name, stats.failed, stats.total));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Generated by instrument-dashboard*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
