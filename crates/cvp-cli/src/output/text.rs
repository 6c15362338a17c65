use colored::Colorize;
use serde_json::Value;

use cvp_core::report::render_text;

use super::{as_report, table};

/// Print an assembled report as the screen summary, colouring notes by tone.
/// Anything else falls back to a table.
pub fn print_text(value: &Value) {
    let Some(report) = as_report(value) else {
        table::print_table(value);
        return;
    };

    for line in render_text(&report).lines() {
        println!("{}", colorize(line));
    }
}

fn colorize(line: &str) -> String {
    let trimmed = line.trim_start();
    if trimmed.starts_with("[ok]") {
        line.green().to_string()
    } else if trimmed.starts_with("[!]") {
        line.yellow().to_string()
    } else if trimmed.starts_with("[x]") {
        line.red().to_string()
    } else if trimmed.starts_with("[i]") {
        line.cyan().to_string()
    } else {
        line.to_string()
    }
}
