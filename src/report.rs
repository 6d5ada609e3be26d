use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::glossary::GLOSSARY;
use crate::models::{RetryDepthRow, SourceSummary};
use crate::pipeline::Analysis;

pub const NO_DATA: &str = "no data";

pub const SUMMARY_COLUMNS: &[&str] = &[
    "Source",
    "L100R",
    "CTR",
    "Booking rate (%)",
    "Utilization (%)",
    "Unconsumed (%)",
    "Status",
    "Retry rate (%)",
    "System retry rate (%)",
    "Avg attempts",
    "Records",
    "Uncontacted (open)",
    "Callback (agent)",
    "Callback (system)",
    "Closed by agent",
    "Closed by system",
    "No phone",
    "Attempts",
    "Bookings",
    "Last contact",
    "Import date",
    "Avg reaction (days)",
    "CTR alert",
    "Narrative",
];

pub const RETRY_COLUMNS: &[&str] = &[
    "Source",
    "Multi-attempt records",
    "Bookings (multi-attempt)",
    "Mean attempt at booking",
    "Median attempt at booking",
    "Attempt distribution",
    "Callbacks (all)",
    "Callbacks (system)",
];

pub const SKIPPED_COLUMNS: &[&str] = &["Path", "Reason"];

fn metric(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format!("{v:.2}"))
}

fn timestamp(value: Option<NaiveDateTime>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| v.format("%Y-%m-%d %H:%M").to_string())
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}

fn write_row(output: &mut String, cells: &[String]) {
    let escaped: Vec<String> = cells.iter().map(|cell| escape(cell)).collect();
    let _ = writeln!(output, "| {} |", escaped.join(" | "));
}

fn write_header(output: &mut String, columns: &[&str]) {
    let _ = writeln!(output, "| {} |", columns.join(" | "));
    let _ = writeln!(output, "|{}", "---|".repeat(columns.len()));
}

pub fn summary_cells(row: &SourceSummary) -> Vec<String> {
    vec![
        row.source.clone(),
        metric(row.l100r),
        metric(row.ctr),
        metric(row.booking_rate),
        metric(row.utilization),
        metric(row.unconsumed),
        row.status.label().to_string(),
        metric(row.retry_rate),
        metric(row.system_retry_rate),
        format!("{:.2}", row.avg_attempts),
        row.records.to_string(),
        row.open.to_string(),
        row.callback_agent.to_string(),
        row.callback_system.to_string(),
        row.closed_by_agent.to_string(),
        row.closed_by_system.to_string(),
        row.unusable.to_string(),
        row.attempts.to_string(),
        row.bookings.to_string(),
        timestamp(row.last_contact),
        timestamp(row.imported),
        row.reaction_days
            .map_or_else(|| NO_DATA.to_string(), |days| days.to_string()),
        row.alert.label().to_string(),
        row.narrative.clone(),
    ]
}

pub fn retry_cells(row: &RetryDepthRow) -> Vec<String> {
    vec![
        row.source.clone(),
        row.multi_attempt_records.to_string(),
        row.bookings.to_string(),
        metric(row.mean_attempt),
        metric(row.median_attempt),
        row.distribution.clone(),
        row.callbacks_total.to_string(),
        row.callbacks_system.to_string(),
    ]
}

pub fn write_glossary(output: &mut String) {
    let _ = writeln!(output, "## Metric Glossary");
    for entry in GLOSSARY {
        let _ = writeln!(output, "- **{}**: {}", entry.label, entry.description);
    }
}

pub fn build_report(analysis: &Analysis, generated_at: NaiveDateTime) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Source Comparison Report");
    let _ = writeln!(
        output,
        "Generated {} across {} sources",
        generated_at.format("%Y-%m-%d %H:%M"),
        analysis.summary.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Source Comparison");

    if analysis.summary.is_empty() {
        let _ = writeln!(output, "No records found in the given sources.");
    } else {
        write_header(&mut output, SUMMARY_COLUMNS);
        for row in analysis.summary.iter() {
            write_row(&mut output, &summary_cells(row));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Retry Effectiveness");

    if analysis.retry.is_empty() {
        let _ = writeln!(output, "No records were dialed more than once.");
    } else {
        write_header(&mut output, RETRY_COLUMNS);
        for row in analysis.retry.iter() {
            write_row(&mut output, &retry_cells(row));
        }
    }

    if !analysis.skipped.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Skipped Sources");
        for skipped in analysis.skipped.iter() {
            let _ = writeln!(output, "- {}: {}", skipped.path, skipped.reason);
        }
    }

    let _ = writeln!(output);
    write_glossary(&mut output);

    output
}

/// Lines printed after the report is written: skipped sources first, then the ranking.
pub fn console_lines(analysis: &Analysis) -> Vec<String> {
    let mut lines = Vec::new();
    if !analysis.skipped.is_empty() {
        lines.push(format!("Skipped {} unreadable sources:", analysis.skipped.len()));
        lines.extend(
            analysis
                .skipped
                .iter()
                .map(|skipped| format!("- {}: {}", skipped.path, skipped.reason)),
        );
    }

    if analysis.summary.is_empty() {
        lines.push("No records found in the given sources.".to_string());
        return lines;
    }

    lines.push("Sources by CTR (best first):".to_string());
    lines.extend(analysis.summary.iter().map(digest_line));
    lines
}

/// One console line per source, best first.
pub fn digest_line(row: &SourceSummary) -> String {
    format!(
        "- {} CTR {} | booking rate {} | utilization {} | {}{}",
        row.source,
        metric(row.ctr),
        metric(row.booking_rate),
        metric(row.utilization),
        row.alert.label(),
        if row.narrative.is_empty() {
            String::new()
        } else {
            format!(" | {}", row.narrative)
        }
    )
}
