mod bootstrap;

use anyhow::Result;
use clap::Parser;
use toplog_core::report::render_report;
use toplog_core::settings::Settings;
use toplog_data::reader::analyze_log;

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("toplog v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Analyzing {} (watching {} process name(s))",
        settings.log_file.display(),
        settings.processes.len()
    );

    let summary = analyze_log(&settings.log_file, &settings.processes)?;

    print!("{}", render_report(&summary, settings.verbose));

    Ok(())
}
