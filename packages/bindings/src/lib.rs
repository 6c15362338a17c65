use napi::bindgen_prelude::Buffer;
use napi::Result as NapiResult;
use napi_derive::napi;

use cvp_core::config::ReportConfig;
use cvp_core::form::{FormSubmission, ValidatedSubmission};
use cvp_core::metrics;
use cvp_core::render;
use cvp_core::report::{self, StructuredReport};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_submission(submission_json: &str) -> NapiResult<ValidatedSubmission> {
    let submission: FormSubmission =
        serde_json::from_str(submission_json).map_err(to_napi_error)?;
    submission.validate().map_err(to_napi_error)
}

fn parse_config(config_json: Option<String>) -> NapiResult<ReportConfig> {
    let config: ReportConfig = match config_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => ReportConfig::default(),
    };
    config.export.validate().map_err(to_napi_error)?;
    Ok(config)
}

fn build_report(submission_json: &str, config: &ReportConfig) -> NapiResult<StructuredReport> {
    let valid = parse_submission(submission_json)?;
    let computed =
        metrics::compute(&valid.financials, &valid.supplier).map_err(to_napi_error)?;
    Ok(report::assemble(&computed, &valid.financials, config))
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_metrics(submission_json: String) -> NapiResult<String> {
    let valid = parse_submission(&submission_json)?;
    let output = metrics::analyze(&valid.financials, &valid.supplier).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[napi]
pub fn assemble_report(submission_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let structured = build_report(&submission_json, &config)?;
    serde_json::to_string(&structured).map_err(to_napi_error)
}

#[napi]
pub fn render_summary(submission_json: String, config_json: Option<String>) -> NapiResult<String> {
    let config = parse_config(config_json)?;
    let structured = build_report(&submission_json, &config)?;
    Ok(report::render_text(&structured))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// PDF bytes for download; the file name and MIME type come from
/// `reportFileName` and `reportMimeType`.
#[napi]
pub fn export_report_pdf(submission_json: String, config_json: Option<String>) -> NapiResult<Buffer> {
    let config = parse_config(config_json)?;
    let structured = build_report(&submission_json, &config)?;
    let doc = render::export_pdf(&structured, &config.export).map_err(to_napi_error)?;
    Ok(Buffer::from(doc.bytes))
}

#[napi]
pub fn report_file_name(config_json: Option<String>) -> NapiResult<String> {
    Ok(parse_config(config_json)?.export.file_name)
}

#[napi]
pub fn report_mime_type() -> String {
    cvp_core::config::PDF_MIME_TYPE.to_string()
}
