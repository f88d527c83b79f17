use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Peak statistics for a single watched process name.
///
/// The `-1.0` / `-1` sentinels mean "never observed"; peaks only move under
/// strict `>` comparison, so ties keep the timestamp of the first occurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessStats {
    /// The exact COMMAND string this entry tracks.
    pub name: String,
    /// Highest %CPU value seen for this process.
    pub high_cpu: f64,
    /// Snapshot time at which `high_cpu` was first reached.
    pub high_cpu_time: Option<NaiveTime>,
    /// Highest %MEM value seen for this process.
    pub high_mem: f64,
    /// Snapshot time at which `high_mem` was first reached.
    pub high_mem_time: Option<NaiveTime>,
    /// Highest number of concurrent instances within one snapshot.
    pub high_instances: i64,
    /// Snapshot time at which `high_instances` was first reached.
    pub high_instances_time: Option<NaiveTime>,
    /// Instances counted in the snapshot currently being scanned.
    /// Reset to zero every time a snapshot is finalized.
    #[serde(skip)]
    pub current_instances: i64,
}

impl ProcessStats {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            high_cpu: -1.0,
            high_cpu_time: None,
            high_mem: -1.0,
            high_mem_time: None,
            high_instances: -1,
            high_instances_time: None,
            current_instances: 0,
        }
    }

    /// `true` when the process never appeared in any snapshot.
    pub fn never_observed(&self) -> bool {
        self.high_instances < 0
    }
}

/// Accumulated results for one analyzed capture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Path of the capture as given by the caller.
    pub file_name: String,
    /// Number of snapshot headers seen.
    pub snapshot_count: u64,
    /// Time of the first snapshot header, if any.
    pub start_time: Option<NaiveTime>,
    /// Time of the last snapshot header, if any.
    pub end_time: Option<NaiveTime>,
    /// Highest 1-minute load average seen (`-1.0` until the first header).
    pub high_load: f64,
    /// Snapshot time at which `high_load` was first reached.
    pub high_load_time: Option<NaiveTime>,
    /// Per-process peak trackers, in the caller's watch-list order.
    pub processes: Vec<ProcessStats>,
    /// Every distinct COMMAND token seen in any table row.
    pub observed_commands: BTreeSet<String>,
}

impl SessionSummary {
    /// Create an all-sentinel summary with one tracker per watched name.
    ///
    /// The watch list is fixed here; nothing is inserted later.
    pub fn new(file_name: impl Into<String>, watch_names: &[String]) -> Self {
        Self {
            file_name: file_name.into(),
            snapshot_count: 0,
            start_time: None,
            end_time: None,
            high_load: -1.0,
            high_load_time: None,
            processes: watch_names.iter().map(ProcessStats::new).collect(),
            observed_commands: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_stats_starts_at_sentinels() {
        let stats = ProcessStats::new("nginx");
        assert_eq!(stats.high_cpu, -1.0);
        assert_eq!(stats.high_mem, -1.0);
        assert_eq!(stats.high_instances, -1);
        assert_eq!(stats.current_instances, 0);
        assert!(stats.high_cpu_time.is_none());
        assert!(stats.never_observed());
    }

    #[test]
    fn test_session_summary_watch_order_preserved() {
        let watch = vec!["b".to_string(), "a".to_string(), "c".to_string()];
        let summary = SessionSummary::new("top.log", &watch);
        let names: Vec<&str> = summary.processes.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(summary.snapshot_count, 0);
        assert_eq!(summary.high_load, -1.0);
    }
}
