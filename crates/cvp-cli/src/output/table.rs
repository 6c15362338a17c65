use serde_json::Value;
use tabled::{builder::Builder, Table};

use cvp_core::report::{Section, StructuredReport};

use super::as_report;

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(report) = as_report(value) {
        print_report(&report);
        return;
    }

    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_report(report: &StructuredReport) {
    println!("{}", report.title);
    for section in &report.sections {
        println!("\n{}", section.heading);
        print_section(section, &report.currency_label);
    }
}

fn print_section(section: &Section, currency_label: &str) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for field in &section.fields {
        builder.push_record([field.label.clone(), field.value.display(currency_label)]);
    }
    println!("{}", Table::from(builder));

    if let Some(chart) = &section.chart {
        let mut builder = Builder::default();
        builder.push_record([chart.x_label.clone(), chart.y_label.clone()]);
        for (label, value) in chart.labels.iter().zip(&chart.values) {
            builder.push_record([label.clone(), cvp_core::report::sections::format_2dp(*value)]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(table) = &section.table {
        let mut builder = Builder::default();
        builder.push_record(table.headers.clone());
        for row in &table.rows {
            builder.push_record(row.clone());
        }
        println!("{}", Table::from(builder));
    }

    for note in &section.notes {
        println!("  - {}", note.text);
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            if key == "products" {
                continue;
            }
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));

        // Per-product breakdown gets its own table
        if let Some(Value::Array(products)) = res_map.get("products") {
            println!();
            print_array_table(products);
        }
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
