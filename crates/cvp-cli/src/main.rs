mod commands;
mod input;
mod output;
mod prompt;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::form::FormArgs;
use commands::metrics::ComputeArgs;
use commands::report::{ChartArgs, ExportArgs, ReportArgs};

/// Cost-volume-profit finance reports
#[derive(Parser)]
#[command(
    name = "cvp",
    version,
    about = "Cost-volume-profit finance reports",
    long_about = "Computes contribution, PV ratio, break-even point, net profit and \
                  material price variance for a set of products, and renders the \
                  results as a screen summary, a bar chart and a PDF document."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (defaults to text for report and form, json otherwise)
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Report configuration file (TOML, YAML or JSON). Defaults to ./cvp.* if present
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute CVP metrics for a form submission
    Compute(ComputeArgs),
    /// Assemble the structured report for a form submission
    Report(ReportArgs),
    /// Write the PV ratio bar chart as a PNG image
    Chart(ChartArgs),
    /// Export the report as a PDF document
    Export(ExportArgs),
    /// Fill in the form interactively and show the report
    Form(FormArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
    Text,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match settings::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let default_format = match cli.command {
        Commands::Report(_) | Commands::Form(_) => OutputFormat::Text,
        _ => OutputFormat::Json,
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compute(args) => commands::metrics::run_compute(args),
        Commands::Report(args) => commands::report::run_report(args, &config),
        Commands::Chart(args) => commands::report::run_chart(args, &config),
        Commands::Export(args) => commands::report::run_export(args, &config),
        Commands::Form(args) => commands::form::run_form(args, &config),
        Commands::Version => {
            println!("cvp {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output.unwrap_or(default_format), &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
