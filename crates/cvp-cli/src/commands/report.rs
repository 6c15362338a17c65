use clap::Args;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use cvp_core::config::ReportConfig;
use cvp_core::metrics;
use cvp_core::render::{self, chart};
use cvp_core::report::{self, StructuredReport};

use crate::input;

/// Arguments for structured report assembly
#[derive(Args)]
pub struct ReportArgs {
    /// Path to JSON or YAML form submission
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for chart rendering
#[derive(Args)]
pub struct ChartArgs {
    /// Path to JSON or YAML form submission
    #[arg(long)]
    pub input: Option<String>,
    /// Where to write the PNG
    #[arg(long, default_value = "chart.png")]
    pub out: PathBuf,
}

/// Arguments for PDF export
#[derive(Args)]
pub struct ExportArgs {
    /// Path to JSON or YAML form submission
    #[arg(long)]
    pub input: Option<String>,
    /// Directory the document is written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
    /// Override the configured document file name
    #[arg(long)]
    pub file_name: Option<String>,
}

/// Validate, compute and assemble in one pass.
pub fn build_report(
    input_path: Option<&str>,
    config: &ReportConfig,
) -> Result<StructuredReport, Box<dyn std::error::Error>> {
    let valid = input::read_submission(input_path)?.validate()?;
    let computed = metrics::compute(&valid.financials, &valid.supplier)?;
    Ok(report::assemble(&computed, &valid.financials, config))
}

/// Write an exported document into `out_dir` and describe it.
pub fn write_document(
    structured: &StructuredReport,
    config: &ReportConfig,
    out_dir: &std::path::Path,
) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = render::export_pdf(structured, &config.export)?;
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&doc.file_name);
    fs::write(&path, &doc.bytes)?;
    info!(path = %path.display(), "document saved");

    Ok(json!({
        "file": path.display().to_string(),
        "file_name": doc.file_name,
        "mime_type": doc.mime_type,
        "bytes": doc.len(),
    }))
}

pub fn run_report(args: ReportArgs, config: &ReportConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let structured = build_report(args.input.as_deref(), config)?;
    Ok(serde_json::to_value(structured)?)
}

pub fn run_chart(args: ChartArgs, config: &ReportConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let structured = build_report(args.input.as_deref(), config)?;
    let descriptor = structured
        .chart()
        .ok_or("the contribution chart section is disabled in the configuration")?;

    let image = chart::render_bar_chart(descriptor, &config.export.chart)?;
    let png = chart::encode_png(&image)?;
    fs::write(&args.out, &png)?;
    info!(path = %args.out.display(), "chart saved");

    Ok(json!({
        "file": args.out.display().to_string(),
        "width": image.width(),
        "height": image.height(),
        "bytes": png.len(),
        "legend": descriptor.legend(),
    }))
}

pub fn run_export(args: ExportArgs, config: &ReportConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let mut config = config.clone();
    if let Some(name) = args.file_name {
        config.export.file_name = name;
        config.export.validate()?;
    }
    let structured = build_report(args.input.as_deref(), &config)?;
    write_document(&structured, &config, &args.out_dir)
}
