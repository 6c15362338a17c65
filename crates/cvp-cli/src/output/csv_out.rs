use serde_json::Value;
use std::io;

use cvp_core::report::StructuredReport;

use super::as_report;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    if let Some(report) = as_report(value) {
        write_report_csv(&mut wtr, &report);
        let _ = wtr.flush();
        return;
    }

    match value {
        Value::Object(map) => {
            let fields = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in fields {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

/// One row per field: section, field, value.
fn write_report_csv<W: io::Write>(wtr: &mut csv::Writer<W>, report: &StructuredReport) {
    let _ = wtr.write_record(["section", "field", "value"]);
    for section in &report.sections {
        for field in &section.fields {
            let _ = wtr.write_record([
                section.heading.as_str(),
                field.label.as_str(),
                &field.value.display(&report.currency_label),
            ]);
        }
        if let Some(chart) = &section.chart {
            for (label, value) in chart.labels.iter().zip(&chart.values) {
                let _ = wtr.write_record([
                    section.heading.as_str(),
                    label.as_str(),
                    &value.to_string(),
                ]);
            }
        }
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
