//! Shared output formatting for batch results.

use anyhow::Result;
use treelint_core::{BatchReport, Finding};

use crate::OutputFormat;

/// Print batch results in the specified format.
pub fn print(report: &BatchReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &BatchReport) {
    for finding in &report.results {
        println!(
            "\x1b[33m{}\x1b[0m at {}",
            finding.check_id,
            location(finding)
        );
        if let Some(extra) = &finding.extra {
            println!("  = extra: {extra}");
        }
        println!();
    }

    let summary_color = if report.has_findings() {
        "\x1b[31m"
    } else {
        "\x1b[32m"
    };

    print!(
        "{}Found {} finding(s) in {} file(s)",
        summary_color,
        report.results.len(),
        report.files_checked
    );
    if report.files_skipped > 0 {
        print!(", {} malformed file(s) skipped", report.files_skipped);
    }
    println!("\x1b[0m");
}

fn print_json(report: &BatchReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &BatchReport) {
    for finding in &report.results {
        println!("{finding}");
    }
}

/// `path:line:col-line:col`, with whatever parts are known.
fn location(finding: &Finding) -> String {
    let mut out = finding.path.clone();
    if let Some(start) = finding.start {
        out.push_str(&format!(":{}", start.line));
        if let Some(col) = start.col {
            out.push_str(&format!(":{col}"));
        }
        if let Some(end) = finding.end {
            out.push_str(&format!("-{}", end.line));
            if let Some(col) = end.col {
                out.push_str(&format!(":{col}"));
            }
        }
    }
    out
}
