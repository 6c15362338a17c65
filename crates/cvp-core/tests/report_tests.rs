use cvp_core::config::ReportConfig;
use cvp_core::form::FormSubmission;
use cvp_core::metrics::compute;
use cvp_core::report::{assemble, render_text, FieldValue, SectionKind, StructuredReport, Tone};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const SUBMISSION: &str = r#"{
    "company_name": "Acme Industries",
    "product_count": 2,
    "fixed_cost": "200",
    "products": [
        {"name": "A", "selling_price": "100", "variable_cost": "40"},
        {"name": "B", "selling_price": "50", "variable_cost": "50"}
    ],
    "supplier": {"standard_price": "10", "actual_price": "12", "actual_quantity": "100"}
}"#;

fn structured(config: &ReportConfig) -> StructuredReport {
    let submission: FormSubmission = serde_json::from_str(SUBMISSION).unwrap();
    let valid = submission.validate().unwrap();
    let report = compute(&valid.financials, &valid.supplier).unwrap();
    assemble(&report, &valid.financials, config)
}

#[test]
fn test_assemble_is_byte_identical_on_repeat() {
    let submission: FormSubmission = serde_json::from_str(SUBMISSION).unwrap();
    let valid = submission.validate().unwrap();
    let report = compute(&valid.financials, &valid.supplier).unwrap();
    let config = ReportConfig::default();

    let first = serde_json::to_vec(&assemble(&report, &valid.financials, &config)).unwrap();
    let second = serde_json::to_vec(&assemble(&report, &valid.financials, &config)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_end_to_end_figures() {
    let s = structured(&ReportConfig::default());

    let company = s.section(SectionKind::CompanyDetails).unwrap();
    assert_eq!(
        company.field_value("Company Name"),
        Some(&FieldValue::Text("Acme Industries".to_string()))
    );
    assert_eq!(
        company.field_value("Net Profit"),
        Some(&FieldValue::Money(dec!(-140)))
    );

    let be = s.section(SectionKind::BreakEven).unwrap();
    assert_eq!(
        be.field_value("Overall PV Ratio"),
        Some(&FieldValue::Percent(dec!(40)))
    );

    let chart = s.section(SectionKind::ContributionChart).unwrap();
    assert_eq!(
        chart.field_value("Highest Contributor"),
        Some(&FieldValue::Text("A".to_string()))
    );
    assert_eq!(
        chart.field_value("Lowest Contributor"),
        Some(&FieldValue::Text("B".to_string()))
    );
}

#[test]
fn test_report_round_trips_through_json() {
    // Renderers in other processes receive the report as JSON.
    let s = structured(&ReportConfig::default());
    let json = serde_json::to_string(&s).unwrap();
    let back: StructuredReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn test_profitable_company_gets_success_note() {
    let submission: FormSubmission = serde_json::from_str(SUBMISSION).unwrap();
    let mut valid = submission.validate().unwrap();
    valid.financials.products[1].variable_cost = dec!(20);
    valid.supplier.actual_price = dec!(8);
    let report = compute(&valid.financials, &valid.supplier).unwrap();
    let s = assemble(&report, &valid.financials, &ReportConfig::default());

    let stop = s.section(SectionKind::ProductionStop).unwrap();
    assert_eq!(stop.notes[0].tone, Tone::Success);
    let supplier = s.section(SectionKind::SupplierEvaluation).unwrap();
    assert_eq!(supplier.notes[0].tone, Tone::Success);
    assert_eq!(
        supplier.field_value("Material Price Variance"),
        Some(&FieldValue::Money(dec!(200)))
    );
}

#[test]
fn test_custom_title_and_currency_flow_to_text() {
    let config = ReportConfig {
        title: "Quarterly CVP".to_string(),
        currency_label: "USD".to_string(),
        ..ReportConfig::default()
    };
    let text = render_text(&structured(&config));
    assert!(text.starts_with("Quarterly CVP\n"));
    assert!(text.contains("USD 500.00"));
    assert!(!text.contains("Rs."));
}

#[test]
fn test_disabled_chart_section_has_no_chart() {
    let mut config = ReportConfig::default();
    config.sections.contribution_chart = false;
    let s = structured(&config);
    assert!(s.chart().is_none());
    assert_eq!(s.sections.len(), 4);
}
