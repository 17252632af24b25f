use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use tracing::info;

use blockscope::config::Config;
use blockscope::report::ScanRequest;
use blockscope::{scan_or_default, AnalysisOrchestrator};

use crate::output;
use crate::OutputFormat;

pub fn run(
    file: &Path,
    format: Option<OutputFormat>,
    config_path: Option<PathBuf>,
    no_color: bool,
    sequential: bool,
) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let config_path = config_path.unwrap_or_else(|| PathBuf::from(".blockscope.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("invalid config {}", config_path.display()))?;

    let format = match format {
        Some(format) => format,
        None => OutputFormat::from_str(&config.global.output_format, true).map_err(|e| {
            anyhow!("invalid output_format in {}: {e}", config_path.display())
        })?,
    };

    let registry = blockscope_rules::default_registry();
    let mut orchestrator = AnalysisOrchestrator::from_config(registry, &config)?;
    if sequential {
        orchestrator = orchestrator.with_parallel(false);
    }

    let request = ScanRequest::from_file(file, source);
    info!(file = %file.display(), contract = %request.contract_name, "scanning");
    let result = scan_or_default(&orchestrator, &request);

    match format {
        OutputFormat::Json => output::json::print(&result)?,
        OutputFormat::Sarif => output::sarif::print(&result, file)?,
        OutputFormat::Text => output::text::print(&result, no_color)?,
    }

    // findings are reported, not treated as failure
    Ok(())
}
