//! Line classification for `top(1)` capture output.
//!
//! Classification is total: every string maps to exactly one [`LineKind`],
//! and nothing here ever fails. Field extraction from data rows is a
//! separate, caller-driven step because it is only valid inside an active
//! process table.

use chrono::NaiveTime;
use regex::Regex;
use tracing::debug;

// ── LineKind ──────────────────────────────────────────────────────────────────

/// What one line of capture output is.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// An empty line; terminates the current process table.
    Blank,
    /// A `top - HH:MM:SS up ... load average: a, b, c` header.
    ///
    /// Only `load1` feeds the aggregation; the 5- and 15-minute averages are
    /// carried for completeness but not reported.
    SnapshotHeader {
        time: NaiveTime,
        load1: f64,
        load5: f64,
        load15: f64,
    },
    /// The fixed process-table column header; marks the start of a table.
    TableHeader,
    /// Any other non-blank line. Only meaningful inside an active table.
    DataRow,
}

// ── RowFields ─────────────────────────────────────────────────────────────────

/// The three fields of a table row that the aggregation consumes.
///
/// `cpu` and `mem` stay unparsed here; coercion happens at update time via
/// [`parse_metric`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowFields<'a> {
    /// COMMAND, the tail of the row (may contain internal whitespace).
    pub command: &'a str,
    /// %CPU as written in the row.
    pub cpu: &'a str,
    /// %MEM as written in the row.
    pub mem: &'a str,
}

// ── LineClassifier ────────────────────────────────────────────────────────────

/// Stateless classifier holding the compiled patterns for the one supported
/// `top` output format.
pub struct LineClassifier {
    header: Regex,
    table_header: Regex,
    whitespace: Regex,
}

/// Number of whitespace-separated fields in a well-formed table row
/// (PID USER PR NI VIRT RES SHR S %CPU %MEM TIME+ COMMAND).
const ROW_FIELDS: usize = 12;

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            header: Regex::new(
                r"^top\s+-\s+(\d\d:\d\d:\d\d)\s+up.+load average:\s+([0-9.]+),\s+([0-9.]+),\s+([0-9.]+)",
            )
            .expect("regex is valid"),
            table_header: Regex::new(
                r"^\s+PID\s+USER\s+PR\s+NI\s+VIRT\s+RES\s+SHR\s+S\s+%CPU\s+%MEM\s+TIME\+\s+COMMAND",
            )
            .expect("regex is valid"),
            whitespace: Regex::new(r"\s+").expect("regex is valid"),
        }
    }

    /// Classify one line (newline already stripped).
    ///
    /// A whitespace-only line is not [`LineKind::Blank`]; blankness is what
    /// ends a table in real `top` batch output, and that is a truly empty
    /// line.
    pub fn classify(&self, line: &str) -> LineKind {
        if line.is_empty() {
            return LineKind::Blank;
        }

        if let Some(caps) = self.header.captures(line) {
            // The time token shape is guaranteed by the pattern, but the
            // digits may still not form a valid clock time.
            if let Ok(time) = NaiveTime::parse_from_str(&caps[1], "%H:%M:%S") {
                return LineKind::SnapshotHeader {
                    time,
                    load1: parse_metric(&caps[2]),
                    load5: parse_metric(&caps[3]),
                    load15: parse_metric(&caps[4]),
                };
            }
        }

        if self.table_header.is_match(line) {
            return LineKind::TableHeader;
        }

        LineKind::DataRow
    }

    /// Split a data row into its consumed fields.
    ///
    /// The trimmed line is split on runs of whitespace into at most
    /// [`ROW_FIELDS`] parts, the last being the remainder of the line, so a
    /// COMMAND containing spaces survives intact. Returns `None` when the
    /// row has fewer fields than the table defines.
    pub fn split_row<'a>(&self, line: &'a str) -> Option<RowFields<'a>> {
        let fields: Vec<&str> = self.whitespace.splitn(line.trim(), ROW_FIELDS).collect();
        if fields.len() < ROW_FIELDS {
            return None;
        }
        Some(RowFields {
            command: fields[11].trim(),
            cpu: fields[8],
            mem: fields[9],
        })
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ── Numeric coercion ──────────────────────────────────────────────────────────

/// Permissively coerce a numeric field to `f64`.
///
/// Unparsable input becomes `0.0` so that minor formatting noise in a capture
/// never disturbs the aggregate counts.
pub fn parse_metric(s: &str) -> f64 {
    match s.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            debug!("Unparsable numeric field {:?}; coercing to 0.0", s);
            0.0
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
