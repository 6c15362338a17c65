use clap::Args;
use colored::Colorize;
use serde_json::Value;
use std::io;
use std::path::PathBuf;

use cvp_core::config::ReportConfig;
use cvp_core::metrics;
use cvp_core::report;

use crate::commands::report::write_document;
use crate::prompt::Prompter;

/// Arguments for the interactive form
#[derive(Args)]
pub struct FormArgs {
    /// Skip the PDF export even when enabled in the configuration
    #[arg(long)]
    pub no_export: bool,
    /// Directory the document is written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

pub fn run_form(args: FormArgs, config: &ReportConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let stdin = io::stdin();
    let submission = Prompter::new(stdin.lock(), io::stderr()).collect()?;

    let valid = submission.validate()?;
    let computed = metrics::compute(&valid.financials, &valid.supplier)?;
    let structured = report::assemble(&computed, &valid.financials, config);

    if config.export.enabled && !args.no_export {
        // The summary is still shown when only the export fails.
        match write_document(&structured, config, &args.out_dir) {
            Ok(saved) => eprintln!(
                "{} {}",
                "Report saved to".green(),
                saved["file"].as_str().unwrap_or_default()
            ),
            Err(e) => eprintln!("{}: {}", "export failed".red().bold(), e),
        }
    }

    Ok(serde_json::to_value(structured)?)
}
