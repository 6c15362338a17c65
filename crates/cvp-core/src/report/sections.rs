use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

/// A renderer-agnostic report: everything a screen, chart or document
/// needs, with no figure left to re-derive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub title: String,
    pub currency_label: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    CompanyDetails,
    ProductionStop,
    ContributionChart,
    BreakEven,
    SupplierEvaluation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    pub heading: String,
    pub fields: Vec<Field>,
    pub notes: Vec<Note>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub label: String,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Money(Money),
    Percent(Percent),
    Count(usize),
    Number(Decimal),
    List(Vec<String>),
}

/// How a note should be emphasised by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub tone: Tone,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Bar chart of one value per labelled category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<Percent>,
}

impl StructuredReport {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// The first chart in section order, if any section carries one.
    pub fn chart(&self) -> Option<&ChartDescriptor> {
        self.sections.iter().find_map(|s| s.chart.as_ref())
    }
}

impl ChartDescriptor {
    /// One `"n. label: value"` line per bar, left to right. `n` matches the
    /// index mark under each bar of the rendered image.
    pub fn legend(&self) -> Vec<String> {
        self.labels
            .iter()
            .zip(&self.values)
            .enumerate()
            .map(|(i, (label, value))| format!("{}. {}: {}", i + 1, label, format_percent(*value)))
            .collect()
    }
}

impl Section {
    pub(crate) fn new(kind: SectionKind, heading: &str) -> Self {
        Section {
            kind,
            heading: heading.to_string(),
            fields: Vec::new(),
            notes: Vec::new(),
            table: None,
            chart: None,
        }
    }

    pub(crate) fn field(mut self, label: &str, value: FieldValue) -> Self {
        self.fields.push(Field {
            label: label.to_string(),
            value,
        });
        self
    }

    pub(crate) fn note(mut self, tone: Tone, text: impl Into<String>) -> Self {
        self.notes.push(Note {
            tone,
            text: text.into(),
        });
        self
    }

    pub fn field_value(&self, label: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.label == label).map(|f| &f.value)
    }
}

impl FieldValue {
    /// Human-readable form; amounts and ratios are shown to two decimals.
    pub fn display(&self, currency_label: &str) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Money(m) => format_money(currency_label, *m),
            FieldValue::Percent(p) => format_percent(*p),
            FieldValue::Count(n) => n.to_string(),
            FieldValue::Number(d) => d.normalize().to_string(),
            FieldValue::List(items) if items.is_empty() => "None".to_string(),
            FieldValue::List(items) => items.join(", "),
        }
    }
}

pub fn format_money(currency_label: &str, amount: Money) -> String {
    format!("{} {}", currency_label, format_2dp(amount))
}

pub fn format_percent(value: Percent) -> String {
    format!("{}%", format_2dp(value))
}

/// Two decimal places, rounding half away from zero.
pub fn format_2dp(value: Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_and_percent_display() {
        assert_eq!(FieldValue::Money(dec!(500)).display("Rs."), "Rs. 500.00");
        assert_eq!(FieldValue::Money(dec!(-140)).display("Rs."), "Rs. -140.00");
        assert_eq!(FieldValue::Percent(dec!(33.3333)).display("Rs."), "33.33%");
        assert_eq!(format_2dp(dec!(2.345)), "2.35");
    }

    #[test]
    fn test_empty_list_displays_none() {
        assert_eq!(FieldValue::List(vec![]).display("$"), "None");
        assert_eq!(
            FieldValue::List(vec!["A".into(), "B".into()]).display("$"),
            "A, B"
        );
    }

    #[test]
    fn test_chart_legend_numbers_bars_in_order() {
        let chart = ChartDescriptor {
            title: "t".into(),
            x_label: "x".into(),
            y_label: "y".into(),
            labels: vec!["A".into(), "B".into()],
            values: vec![dec!(60), dec!(-12.345)],
        };
        assert_eq!(chart.legend(), vec!["1. A: 60.00%", "2. B: -12.35%"]);
    }

    #[test]
    fn test_field_value_is_tagged_in_json() {
        let json = serde_json::to_value(FieldValue::Count(3)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "count", "value": 3}));
    }
}
