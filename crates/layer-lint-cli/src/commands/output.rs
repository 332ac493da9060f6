//! Shared output formatting for validation reports.

use anyhow::Result;
use layer_lint_core::{Report, Severity};

use crate::OutputFormat;

/// Prints a report in the specified format.
pub fn print(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &Report) {
    for violation in &report.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!("{severity_indicator} [{}] {}", violation.rule, violation.message);
        for witness in &violation.witnesses {
            println!(
                "  = at {}: `{}` imports `{}`",
                witness.location, witness.from_unit, witness.to_unit
            );
        }
        println!();
    }

    if !report.by_kind.is_empty() {
        let grouped: Vec<String> = report
            .by_kind
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect();
        println!("By rule kind: {}", grouped.join(", "));
    }

    let summary_color = if report.passed { "\x1b[32m" } else { "\x1b[31m" };
    println!(
        "{}Checked {} edge(s), found {} violation(s): {}\x1b[0m",
        summary_color,
        report.edges_checked,
        report.total_violations,
        if report.passed { "PASSED" } else { "FAILED" }
    );
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report) {
    for violation in &report.violations {
        match violation.witnesses.first() {
            Some(witness) => println!("{}: {violation}", witness.location),
            None => println!("{violation}"),
        }
    }
}
