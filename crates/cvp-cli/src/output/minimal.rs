use serde_json::Value;

use cvp_core::report::SectionKind;

use super::as_report;

/// Print just the key answer value from the output.
///
/// For a report that is the break-even point; otherwise the first present
/// field from a priority list, then the first field of the result.
pub fn print_minimal(value: &Value) {
    if let Some(report) = as_report(value) {
        let bep = report
            .section(SectionKind::BreakEven)
            .and_then(|s| s.field_value("Break Even Point"));
        if let Some(field) = bep {
            println!("{}", field.display(&report.currency_label));
            return;
        }
        let first = report.sections.first().and_then(|s| s.fields.first());
        if let Some(field) = first {
            println!("{}: {}", field.label, field.value.display(&report.currency_label));
            return;
        }
        println!("{}", report.title);
        return;
    }

    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "break_even_point",
        "net_profit",
        "overall_pv_ratio",
        "material_price_variance",
        "file",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
