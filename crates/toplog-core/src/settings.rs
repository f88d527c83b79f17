use clap::Parser;
use std::path::PathBuf;

/// Summarize peak load and per-process peaks from a top(1) batch capture
#[derive(Parser, Debug, Clone)]
#[command(
    name = "toplog",
    about = "Summarize peak load and per-process peaks from a top(1) batch capture",
    version
)]
pub struct Settings {
    /// Path to the capture file to analyze
    pub log_file: PathBuf,

    /// Process names to watch (exact COMMAND matches)
    pub processes: Vec<String>,

    /// Also list every distinct COMMAND seen in the capture
    #[arg(short, long)]
    pub verbose: bool,

    /// Logging level
    #[arg(long, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,
}
