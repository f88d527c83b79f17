//! File-streaming pipeline: classify each line of a capture and feed it
//! into the aggregator.

use std::io::BufRead;
use std::path::Path;

use toplog_core::classifier::{LineClassifier, LineKind};
use toplog_core::error::{Result, ToplogError};
use toplog_core::models::SessionSummary;
use tracing::{debug, warn};

use crate::aggregator::SnapshotAggregator;

/// Analyze one capture file against a fixed watch list.
///
/// The file is streamed line by line in order; memory use is bounded by the
/// watch list plus the set of distinct COMMAND names, not by file length.
/// A missing or unreadable file is the one fatal condition; everything else
/// degrades to skipped lines.
pub fn analyze_log(path: &Path, watch_names: &[String]) -> Result<SessionSummary> {
    let file = std::fs::File::open(path).map_err(|source| ToplogError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let classifier = LineClassifier::new();
    let mut aggregator = SnapshotAggregator::new(path.display().to_string(), watch_names);

    let mut lines_read = 0u64;
    let mut rows_skipped = 0u64;

    let reader = std::io::BufReader::new(file);
    for line_result in reader.lines() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) => {
                debug!("Skipping unreadable line in {}: {}", path.display(), e);
                continue;
            }
        };
        lines_read += 1;

        // CRLF captures must classify identically to LF ones.
        let line = line.trim_end_matches('\r');

        match classifier.classify(line) {
            LineKind::Blank => aggregator.on_blank(),
            LineKind::SnapshotHeader { time, load1, .. } => {
                aggregator.on_snapshot_header(time, load1)
            }
            LineKind::TableHeader => aggregator.on_table_header(),
            LineKind::DataRow => {
                if !aggregator.in_table() {
                    continue;
                }
                match classifier.split_row(line) {
                    Some(fields) => {
                        aggregator.on_data_row(fields.command, fields.cpu, fields.mem)
                    }
                    None => {
                        rows_skipped += 1;
                        debug!("Malformed table row at line {} of {}", lines_read, path.display());
                    }
                }
            }
        }
    }

    if rows_skipped > 0 {
        warn!(
            "Skipped {} malformed table row(s) in {}",
            rows_skipped,
            path.display()
        );
    }

    let summary = aggregator.finish();
    debug!(
        "Analyzed {}: {} lines, {} snapshots, {} distinct commands",
        path.display(),
        lines_read,
        summary.snapshot_count,
        summary.observed_commands.len()
    );

    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M:%S").unwrap()
    }

    fn watched(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn write_log(dir: &TempDir, lines: &[&str]) -> PathBuf {
        let path = dir.path().join("top.log");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    const HEADER_1: &str =
        "top - 09:00:01 up 1 day,  3:20,  2 users,  load average: 1.50, 1.00, 0.90";
    const HEADER_2: &str =
        "top - 09:01:01 up 1 day,  3:21,  2 users,  load average: 0.80, 0.95, 0.90";
    const TABLE: &str = "  PID USER      PR  NI  VIRT  RES  SHR S %CPU %MEM    TIME+  COMMAND";
    const NGINX_ROW: &str =
        "    1 root      15   0 10364  740  620 S  2.5  1.0   0:07.05 nginx";

    #[test]
    fn test_single_snapshot_peaks() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[HEADER_1, TABLE, NGINX_ROW, ""]);

        let summary = analyze_log(&path, &watched(&["nginx"])).unwrap();

        assert_eq!(summary.snapshot_count, 1);
        assert_eq!(summary.high_load, 1.50);
        assert_eq!(summary.high_load_time, Some(time("09:00:01")));

        let nginx = &summary.processes[0];
        assert_eq!(nginx.high_cpu, 2.5);
        assert_eq!(nginx.high_cpu_time, Some(time("09:00:01")));
        assert_eq!(nginx.high_mem, 1.0);
        assert_eq!(nginx.high_mem_time, Some(time("09:00:01")));
        assert_eq!(nginx.high_instances, 1);
        assert_eq!(nginx.high_instances_time, Some(time("09:00:01")));
    }

    #[test]
    fn test_instance_peak_across_snapshots() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            &[
                HEADER_1, TABLE, NGINX_ROW, NGINX_ROW, "", HEADER_2, TABLE, NGINX_ROW, "",
            ],
        );

        let summary = analyze_log(&path, &watched(&["nginx"])).unwrap();
        let nginx = &summary.processes[0];
        assert_eq!(nginx.high_instances, 2);
        assert_eq!(nginx.high_instances_time, Some(time("09:00:01")));
        assert_eq!(summary.snapshot_count, 2);
    }

    #[test]
    fn test_watched_but_absent_process_stays_sentinel() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[HEADER_1, TABLE, NGINX_ROW, ""]);

        let summary = analyze_log(&path, &watched(&["nginx", "redis"])).unwrap();
        let redis = &summary.processes[1];
        assert!(redis.never_observed());
        assert_eq!(redis.high_instances, -1);
    }

    #[test]
    fn test_empty_file_yields_all_sentinel_summary() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[]);

        let summary = analyze_log(&path, &watched(&["nginx"])).unwrap();
        assert_eq!(summary.snapshot_count, 0);
        assert_eq!(summary.high_load, -1.0);
        assert!(summary.start_time.is_none());
        assert!(summary.processes[0].never_observed());
    }

    #[test]
    fn test_missing_file_is_file_read_error() {
        let err = analyze_log(Path::new("/does/not/exist.log"), &[]).unwrap_err();
        match err {
            ToplogError::FileRead { path, .. } => {
                assert_eq!(path, PathBuf::from("/does/not/exist.log"));
            }
            other => panic!("expected FileRead, got {}", other),
        }
    }

    #[test]
    fn test_rows_before_table_header_are_ignored() {
        let dir = TempDir::new().unwrap();
        // The summary lines top prints between the header and the table
        // must not be treated as process rows.
        let path = write_log(
            &dir,
            &[
                HEADER_1,
                "Tasks:  95 total,   1 running,  94 sleeping,   0 stopped",
                "Mem:  16314240k total, 12002356k used,  4311884k free",
                TABLE,
                NGINX_ROW,
                "",
            ],
        );

        let summary = analyze_log(&path, &watched(&["nginx"])).unwrap();
        assert_eq!(summary.processes[0].high_instances, 1);
        assert!(!summary.observed_commands.contains("sleeping,"));
    }

    #[test]
    fn test_blank_line_ends_table_scanning() {
        let dir = TempDir::new().unwrap();
        // A row after the blank is outside any table and must be ignored.
        let path = write_log(&dir, &[HEADER_1, TABLE, NGINX_ROW, "", NGINX_ROW]);

        let summary = analyze_log(&path, &watched(&["nginx"])).unwrap();
        assert_eq!(summary.processes[0].high_instances, 1);
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, &[HEADER_1, TABLE, "  12 root broken", NGINX_ROW, ""]);

        let summary = analyze_log(&path, &watched(&["nginx"])).unwrap();
        // The short row is dropped; the well-formed one still counts.
        assert_eq!(summary.processes[0].high_instances, 1);
        assert!(!summary.observed_commands.contains("broken"));
    }

    #[test]
    fn test_crlf_capture_parses_identically() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crlf.log");
        let mut file = std::fs::File::create(&path).unwrap();
        for line in [HEADER_1, TABLE, NGINX_ROW, ""] {
            write!(file, "{}\r\n", line).unwrap();
        }

        let summary = analyze_log(&path, &watched(&["nginx"])).unwrap();
        assert_eq!(summary.snapshot_count, 1);
        assert_eq!(summary.processes[0].high_cpu, 2.5);
    }

    #[test]
    fn test_reanalysis_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_log(
            &dir,
            &[HEADER_1, TABLE, NGINX_ROW, "", HEADER_2, TABLE, NGINX_ROW, ""],
        );

        let watch = watched(&["nginx"]);
        let first = analyze_log(&path, &watch).unwrap();
        let second = analyze_log(&path, &watch).unwrap();

        assert_eq!(first.snapshot_count, second.snapshot_count);
        assert_eq!(first.high_load, second.high_load);
        assert_eq!(first.high_load_time, second.high_load_time);
        assert_eq!(first.processes[0].high_cpu, second.processes[0].high_cpu);
        assert_eq!(
            first.processes[0].high_instances,
            second.processes[0].high_instances
        );
        assert_eq!(first.observed_commands, second.observed_commands);
    }

    #[test]
    fn test_verbose_command_set_collects_all_rows() {
        let dir = TempDir::new().unwrap();
        let sshd = "  201 root      20   0 12364  940  720 S  0.1  0.2   0:01.00 sshd";
        let path = write_log(&dir, &[HEADER_1, TABLE, NGINX_ROW, sshd, ""]);

        let summary = analyze_log(&path, &watched(&[])).unwrap();
        let commands: Vec<&str> = summary
            .observed_commands
            .iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(commands, vec!["nginx", "sshd"]);
    }
}
