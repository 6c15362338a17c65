use rust_decimal::prelude::ToPrimitive;
use std::fmt::Write;

use super::sections::{format_2dp, ChartDescriptor, Section, StructuredReport, Table, Tone};

const BAR_WIDTH: usize = 40;

/// Render a report as a plain-text screen summary.
pub fn render_text(report: &StructuredReport) -> String {
    let mut out = String::new();
    underline(&mut out, &report.title, '=');

    for section in &report.sections {
        out.push('\n');
        render_section(&mut out, section, &report.currency_label);
    }
    out
}

fn render_section(out: &mut String, section: &Section, currency_label: &str) {
    underline(out, &section.heading, '-');

    let width = section
        .fields
        .iter()
        .map(|f| f.label.len())
        .max()
        .unwrap_or(0);
    for field in &section.fields {
        let _ = writeln!(
            out,
            "  {:<width$}  {}",
            format!("{}:", field.label),
            field.value.display(currency_label),
            width = width + 1
        );
    }

    if let Some(chart) = &section.chart {
        out.push('\n');
        render_chart(out, chart);
    }
    if let Some(table) = &section.table {
        out.push('\n');
        render_table(out, table);
    }

    if !section.notes.is_empty() {
        out.push('\n');
    }
    for note in &section.notes {
        let _ = writeln!(out, "  {} {}", marker(note.tone), note.text);
    }
}

fn marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Info => "[i]",
        Tone::Success => "[ok]",
        Tone::Warning => "[!]",
        Tone::Error => "[x]",
    }
}

fn underline(out: &mut String, text: &str, ch: char) {
    let _ = writeln!(out, "{}", text);
    let _ = writeln!(out, "{}", ch.to_string().repeat(text.chars().count()));
}

/// Horizontal bars scaled to the largest absolute value.
fn render_chart(out: &mut String, chart: &ChartDescriptor) {
    let _ = writeln!(out, "  {}", chart.title);
    let label_width = chart
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    let max_abs = chart
        .values
        .iter()
        .filter_map(|v| v.abs().to_f64())
        .fold(0.0_f64, f64::max);

    for (label, value) in chart.labels.iter().zip(&chart.values) {
        let magnitude = value.abs().to_f64().unwrap_or(0.0);
        let len = if max_abs > 0.0 {
            ((magnitude / max_abs) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let glyph = if value.is_sign_negative() { "-" } else { "#" };
        let _ = writeln!(
            out,
            "  {:<label_width$} | {} {}%",
            label,
            glyph.repeat(len),
            format_2dp(*value),
            label_width = label_width
        );
    }
    let _ = writeln!(out, "  x: {}  y: {}", chart.x_label, chart.y_label);
}

fn render_table(out: &mut String, table: &Table) {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let _ = writeln!(out, "  {}", line(table.headers.as_slice()));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "  {}", rule.join("-+-"));
    for row in &table.rows {
        let _ = writeln!(out, "  {}", line(row.as_slice()));
    }
}
