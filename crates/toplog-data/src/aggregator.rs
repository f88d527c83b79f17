//! Streaming aggregation over classified capture lines.
//!
//! One [`SnapshotAggregator`] per analyzed file. Lines arrive in file order;
//! a snapshot's instance counts are only complete once the *next* header (or
//! end of input) arrives, so finalization is tied to headers, not to the
//! blank lines that merely end table scanning.

use chrono::NaiveTime;
use toplog_core::classifier::parse_metric;
use toplog_core::models::SessionSummary;

/// Owns all running state of an analysis: the session summary plus the
/// transient per-snapshot table flag and timestamp.
pub struct SnapshotAggregator {
    summary: SessionSummary,
    current_time: Option<NaiveTime>,
    inside_table: bool,
}

impl SnapshotAggregator {
    /// Start a fresh analysis for `file_name` with a fixed watch list.
    pub fn new(file_name: impl Into<String>, watch_names: &[String]) -> Self {
        Self {
            summary: SessionSummary::new(file_name, watch_names),
            current_time: None,
            inside_table: false,
        }
    }

    /// A blank line ends table scanning. It does not finalize the snapshot.
    pub fn on_blank(&mut self) {
        self.inside_table = false;
    }

    /// A new snapshot header: finalize the previous snapshot (if any), adopt
    /// the new timestamp and fold the 1-minute load average into the peak.
    pub fn on_snapshot_header(&mut self, time: NaiveTime, load1: f64) {
        if let Some(previous) = self.current_time {
            self.finalize_snapshot(previous);
        }
        self.inside_table = false;
        self.current_time = Some(time);

        if load1 > self.summary.high_load {
            self.summary.high_load = load1;
            self.summary.high_load_time = Some(time);
        }
    }

    /// The column header marks the start of a process table.
    pub fn on_table_header(&mut self) {
        self.inside_table = true;
    }

    /// Whether data rows are currently part of an active table.
    pub fn in_table(&self) -> bool {
        self.inside_table
    }

    /// Fold one table row into the running state.
    ///
    /// The caller only invokes this while [`in_table`](Self::in_table) holds.
    /// Rows with an empty COMMAND are ignored. Watched-name matching is
    /// exact; `cpu` and `mem` are coerced permissively at this point.
    pub fn on_data_row(&mut self, command: &str, cpu: &str, mem: &str) {
        if command.is_empty() {
            return;
        }
        self.summary.observed_commands.insert(command.to_string());

        for process in &mut self.summary.processes {
            if process.name != command {
                continue;
            }
            let cpu = parse_metric(cpu);
            if cpu > process.high_cpu {
                process.high_cpu = cpu;
                process.high_cpu_time = self.current_time;
            }
            let mem = parse_metric(mem);
            if mem > process.high_mem {
                process.high_mem = mem;
                process.high_mem_time = self.current_time;
            }
            process.current_instances += 1;
        }
    }

    /// Consume the aggregator, finalizing the last open snapshot if any
    /// header was ever seen. A headerless capture yields the all-sentinel
    /// summary untouched.
    pub fn finish(mut self) -> SessionSummary {
        if let Some(time) = self.current_time {
            self.finalize_snapshot(time);
        }
        self.summary
    }

    /// Commit the snapshot that just ended: roll the per-process instance
    /// counts into their peaks, reset the counters and advance the session
    /// bookkeeping.
    fn finalize_snapshot(&mut self, time: NaiveTime) {
        if self.summary.start_time.is_none() {
            self.summary.start_time = Some(time);
        }
        self.summary.end_time = Some(time);
        self.summary.snapshot_count += 1;

        for process in &mut self.summary.processes {
            if process.current_instances > process.high_instances {
                process.high_instances = process.current_instances;
                process.high_instances_time = Some(time);
            }
            process.current_instances = 0;
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
