use clap::Args;
use serde_json::Value;

use cvp_core::metrics;

use crate::input;

/// Arguments for CVP metric computation
#[derive(Args)]
pub struct ComputeArgs {
    /// Path to JSON or YAML form submission
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compute(args: ComputeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let valid = input::read_submission(args.input.as_deref())?.validate()?;
    let result = metrics::analyze(&valid.financials, &valid.supplier)?;
    Ok(serde_json::to_value(result)?)
}
