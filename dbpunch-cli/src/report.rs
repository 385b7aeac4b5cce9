//! Rendering of the final run report.

use std::fmt::Write;
use std::num::NonZeroUsize;

use dbpunch_runner::RunReport;
use yansi::Paint;

/// Renders the run report for the terminal.
///
/// The failure count is always shown; latency statistics are replaced by an
/// explicit "no successful writes" line when no write succeeded.
pub fn render(report: &RunReport, max_concurrent: NonZeroUsize) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} ({} records, concurrency: {})",
        "## RESULTS".bold(),
        report.attempted.bold(),
        max_concurrent.bold(),
    );

    if report.failed > 0 {
        let _ = writeln!(
            out,
            "{}",
            format!("failed to send: {}", report.failed).bold().red()
        );
    } else {
        let _ = writeln!(out, "failed to send: 0");
    }

    match &report.latency {
        Some(latency) => {
            let _ = writeln!(out, "  average: {:.2?}", latency.average.bold());
            let _ = writeln!(out, "  minimum: {:.2?}", latency.minimum);
            let _ = writeln!(out, "  maximum: {:.2?}", latency.maximum);
            let _ = writeln!(out, "  median:  {:.2?}", latency.median);
        }
        None => {
            let _ = writeln!(out, "{}", "no successful writes".bold());
        }
    }

    out
}
