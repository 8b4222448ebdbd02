mod bootstrap;
mod printer;

use anyhow::Result;
use stats_core::settings::{ReportFormat, Settings};
use stats_data::analysis::{analyze_path, AnalysisOptions};

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();
    settings.validate()?;

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("crime-stats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Policy: {}, Trend: {:?}, Format: {:?}",
        settings.policy,
        settings.trend,
        settings.format
    );

    let working_dir = std::env::current_dir()?;
    let data_path = bootstrap::discover_data_path(settings.data_path.as_deref(), &working_dir);

    let options = AnalysisOptions {
        policy: settings.policy,
        trend_fill: settings.trend,
        top_areas: settings.top_areas,
    };

    let result = analyze_path(&data_path, &options)?;
    tracing::debug!(
        "Read {} files ({} rows skipped) in {:.3}s, analysed in {:.3}s",
        result.metadata.files_read,
        result.metadata.rows_skipped,
        result.metadata.load_time_seconds,
        result.metadata.analysis_time_seconds
    );

    match settings.format {
        ReportFormat::Text => print!("{}", printer::render_text(&result.report)),
        ReportFormat::Json => println!("{}", printer::render_json(&result)?),
    }

    Ok(())
}
