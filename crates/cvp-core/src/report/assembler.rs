use tracing::debug;

use super::sections::{
    format_2dp, ChartDescriptor, FieldValue, Section, SectionKind, StructuredReport, Table, Tone,
};
use crate::config::ReportConfig;
use crate::metrics::{CompanyFinancials, FinancialReport, VarianceVerdict};

pub const CHART_TITLE: &str = "Product PV Ratio Comparison";
pub const CHART_X_LABEL: &str = "Product Name";
pub const CHART_Y_LABEL: &str = "PV Ratio per Unit (%)";

/// Lay out a computed report as ordered sections.
///
/// Sections always appear in the same order; those disabled in `config` are
/// left out. The output depends only on the arguments, so assembling the same
/// report twice yields identical sections.
pub fn assemble(
    report: &FinancialReport,
    financials: &CompanyFinancials,
    config: &ReportConfig,
) -> StructuredReport {
    let toggles = &config.sections;
    let mut sections = Vec::with_capacity(5);

    if toggles.company_details {
        sections.push(company_details(report, financials));
    }
    if toggles.production_stop {
        sections.push(production_stop(report));
    }
    if toggles.contribution_chart {
        sections.push(contribution_chart(report, config.product_table));
    }
    if toggles.break_even {
        sections.push(break_even(report));
    }
    if toggles.supplier_evaluation {
        sections.push(supplier_evaluation(report));
    }

    debug!(sections = sections.len(), "assembled report");

    StructuredReport {
        title: config.title.clone(),
        currency_label: config.currency_label.clone(),
        sections,
    }
}

fn company_details(report: &FinancialReport, financials: &CompanyFinancials) -> Section {
    Section::new(SectionKind::CompanyDetails, "Company Details")
        .field(
            "Company Name",
            FieldValue::Text(financials.company_name.clone()),
        )
        .field("Number of Products", FieldValue::Count(report.products.len()))
        .field("Fixed Cost", FieldValue::Money(report.fixed_cost))
        .field("Total Sales", FieldValue::Money(report.total_sales))
        .field(
            "Total Variable Cost",
            FieldValue::Money(report.total_variable_cost),
        )
        .field("Net Profit", FieldValue::Money(report.net_profit))
}

fn production_stop(report: &FinancialReport) -> Section {
    let section = Section::new(
        SectionKind::ProductionStop,
        "Products with Non-Positive Contribution",
    )
    .field(
        "Stop Production",
        FieldValue::List(report.stop_production.clone()),
    );

    if report.stop_production.is_empty() {
        section.note(
            Tone::Success,
            "All products are profitable. No need to stop production.",
        )
    } else {
        section.note(
            Tone::Warning,
            format!(
                "Stop production of these products: {}",
                report.stop_production.join(", ")
            ),
        )
    }
}

fn contribution_chart(report: &FinancialReport, with_table: bool) -> Section {
    let mut section = Section::new(SectionKind::ContributionChart, "Product PV Ratios")
        .field(
            "Highest Contributor",
            FieldValue::Text(report.max_contributor.clone()),
        )
        .field(
            "Lowest Contributor",
            FieldValue::Text(report.min_contributor.clone()),
        )
        .note(
            Tone::Info,
            format!(
                "{} has the highest PV ratio and contributes the most per unit of sales.",
                report.max_contributor
            ),
        )
        .note(
            Tone::Info,
            format!(
                "{} has the lowest PV ratio and contributes the least per unit of sales.",
                report.min_contributor
            ),
        );

    section.chart = Some(ChartDescriptor {
        title: CHART_TITLE.to_string(),
        x_label: CHART_X_LABEL.to_string(),
        y_label: CHART_Y_LABEL.to_string(),
        labels: report.products.iter().map(|p| p.name.clone()).collect(),
        values: report.products.iter().map(|p| p.pv_ratio).collect(),
    });

    if with_table {
        section.table = Some(Table {
            headers: vec![
                "Product".to_string(),
                "Selling Price".to_string(),
                "Variable Cost".to_string(),
                "Contribution".to_string(),
                "PV Ratio (%)".to_string(),
            ],
            rows: report
                .products
                .iter()
                .map(|p| {
                    vec![
                        p.name.clone(),
                        format_2dp(p.selling_price),
                        format_2dp(p.variable_cost),
                        format_2dp(p.contribution),
                        format_2dp(p.pv_ratio),
                    ]
                })
                .collect(),
        });
    }

    section
}

fn break_even(report: &FinancialReport) -> Section {
    Section::new(SectionKind::BreakEven, "Break-Even Point")
        .field(
            "Overall PV Ratio",
            FieldValue::Percent(report.overall_pv_ratio),
        )
        .field(
            "Break Even Point",
            FieldValue::Money(report.break_even_point),
        )
}

fn supplier_evaluation(report: &FinancialReport) -> Section {
    let supplier = &report.supplier;
    let section = Section::new(SectionKind::SupplierEvaluation, "Supplier Evaluation")
        .field(
            "Standard Price",
            FieldValue::Money(supplier.standard_price),
        )
        .field("Actual Price", FieldValue::Money(supplier.actual_price))
        .field(
            "Actual Quantity",
            FieldValue::Number(supplier.actual_quantity),
        )
        .field(
            "Material Price Variance",
            FieldValue::Money(report.material_price_variance),
        )
        .field(
            "Verdict",
            FieldValue::Text(report.variance_verdict.label().to_string()),
        );

    match report.variance_verdict {
        VarianceVerdict::Favourable => section.note(
            Tone::Success,
            "Favourable variance: supplier pricing is good.",
        ),
        VarianceVerdict::Unfavourable => section.note(
            Tone::Error,
            "Unfavourable variance: consider changing suppliers or reviewing material costs.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{compute, Product, SupplierEvaluation};
    use rust_decimal_macros::dec;

    fn inputs() -> (FinancialReport, CompanyFinancials) {
        let company = CompanyFinancials {
            company_name: "Acme Industries".to_string(),
            fixed_cost: dec!(200),
            products: vec![
                Product::new("A", dec!(100), dec!(40)),
                Product::new("B", dec!(50), dec!(50)),
            ],
        };
        let supplier = SupplierEvaluation {
            standard_price: dec!(10),
            actual_price: dec!(12),
            actual_quantity: dec!(100),
        };
        (compute(&company, &supplier).unwrap(), company)
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let (report, company) = inputs();
        let s = assemble(&report, &company, &ReportConfig::default());
        let kinds: Vec<SectionKind> = s.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::CompanyDetails,
                SectionKind::ProductionStop,
                SectionKind::ContributionChart,
                SectionKind::BreakEven,
                SectionKind::SupplierEvaluation,
            ]
        );
    }

    #[test]
    fn test_disabled_sections_are_omitted() {
        let (report, company) = inputs();
        let mut cfg = ReportConfig::default();
        cfg.sections.production_stop = false;
        cfg.sections.break_even = false;
        let s = assemble(&report, &company, &cfg);
        let kinds: Vec<SectionKind> = s.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::CompanyDetails,
                SectionKind::ContributionChart,
                SectionKind::SupplierEvaluation,
            ]
        );
    }

    #[test]
    fn test_stop_section_warns_with_names() {
        let (report, company) = inputs();
        let s = assemble(&report, &company, &ReportConfig::default());
        let stop = s.section(SectionKind::ProductionStop).unwrap();
        assert_eq!(stop.notes[0].tone, Tone::Warning);
        assert_eq!(stop.notes[0].text, "Stop production of these products: B");
    }

    #[test]
    fn test_chart_descriptor_matches_products() {
        let (report, company) = inputs();
        let s = assemble(&report, &company, &ReportConfig::default());
        let chart = s.chart().unwrap();
        assert_eq!(chart.labels, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(chart.values, vec![dec!(60), dec!(0)]);
        assert_eq!(chart.y_label, CHART_Y_LABEL);
    }

    #[test]
    fn test_product_table_toggle() {
        let (report, company) = inputs();
        let mut cfg = ReportConfig::default();
        let with = assemble(&report, &company, &cfg);
        let table = with
            .section(SectionKind::ContributionChart)
            .and_then(|s| s.table.as_ref())
            .unwrap();
        assert_eq!(table.rows[0], vec!["A", "100.00", "40.00", "60.00", "60.00"]);

        cfg.product_table = false;
        let without = assemble(&report, &company, &cfg);
        assert!(without
            .section(SectionKind::ContributionChart)
            .unwrap()
            .table
            .is_none());
    }

    #[test]
    fn test_break_even_and_supplier_fields() {
        let (report, company) = inputs();
        let s = assemble(&report, &company, &ReportConfig::default());
        let be = s.section(SectionKind::BreakEven).unwrap();
        assert_eq!(
            be.field_value("Break Even Point"),
            Some(&FieldValue::Money(dec!(500)))
        );
        let sup = s.section(SectionKind::SupplierEvaluation).unwrap();
        assert_eq!(sup.notes[0].tone, Tone::Error);
        assert_eq!(
            sup.field_value("Verdict"),
            Some(&FieldValue::Text("unfavourable".to_string()))
        );
    }
}
