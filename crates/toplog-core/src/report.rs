use chrono::NaiveTime;
use std::fmt::Write;

use crate::models::SessionSummary;

/// Render the human-readable summary report.
///
/// Watched processes appear in watch-list order. A process that never showed
/// up in any snapshot gets a single "no instances" line instead of its three
/// peak lines. With `verbose`, every distinct COMMAND seen in the capture is
/// listed afterwards in sorted order.
pub fn render_report(summary: &SessionSummary, verbose: bool) -> String {
    let mut out = String::new();

    writeln!(out, "{}", summary.file_name).ok();
    writeln!(
        out,
        "{} snapshots from {} to {}",
        summary.snapshot_count,
        fmt_time(summary.start_time),
        fmt_time(summary.end_time)
    )
    .ok();
    writeln!(
        out,
        "high load {} at {}",
        summary.high_load,
        fmt_time(summary.high_load_time)
    )
    .ok();

    for process in &summary.processes {
        writeln!(out, "process {}", process.name).ok();
        if process.never_observed() {
            writeln!(out, "  no instances seen").ok();
        } else {
            writeln!(
                out,
                "  high cpu  {} at {}",
                process.high_cpu,
                fmt_time(process.high_cpu_time)
            )
            .ok();
            writeln!(
                out,
                "  high mem  {} at {}",
                process.high_mem,
                fmt_time(process.high_mem_time)
            )
            .ok();
            writeln!(
                out,
                "  high inst {} at {}",
                process.high_instances,
                fmt_time(process.high_instances_time)
            )
            .ok();
        }
    }

    if verbose {
        writeln!(out, "all processes").ok();
        for command in &summary.observed_commands {
            writeln!(out, "  '{}'", command).ok();
        }
    }

    out
}

/// `HH:MM:SS`, or `-` when the time was never set.
fn fmt_time(time: Option<NaiveTime>) -> String {
    match time {
        Some(t) => t.format("%H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
