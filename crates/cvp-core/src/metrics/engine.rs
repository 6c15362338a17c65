use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use super::product::{self, Product, ProductMetrics};
use super::supplier::{SupplierEvaluation, VarianceVerdict};
use crate::error::CvpError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::CvpResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Company-level inputs for one report submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancials {
    pub company_name: String,
    /// Total fixed cost for the period
    pub fixed_cost: Money,
    /// Product lines in input order
    pub products: Vec<Product>,
}

/// Cost-volume-profit figures derived from one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialReport {
    /// Per-product breakdown in input order
    pub products: Vec<ProductMetrics>,
    pub fixed_cost: Money,
    pub total_sales: Money,
    pub total_variable_cost: Money,
    /// total_sales - total_variable_cost
    pub total_contribution: Money,
    /// Zero when there are no sales
    pub overall_pv_ratio: Percent,
    /// fixed_cost / (overall_pv_ratio / 100), zero when the ratio is not positive
    pub break_even_point: Money,
    /// total_sales - (fixed_cost + total_variable_cost)
    pub net_profit: Money,
    /// Products with non-positive contribution, in input order
    pub stop_production: Vec<String>,
    pub max_contributor: String,
    pub min_contributor: String,
    /// Supplier inputs the variance was computed from
    pub supplier: SupplierEvaluation,
    pub material_price_variance: Money,
    pub variance_verdict: VarianceVerdict,
}

// ---------------------------------------------------------------------------
// Function 1: compute
// ---------------------------------------------------------------------------

/// Derive every CVP figure for a company and its supplier evaluation.
///
/// Inputs are expected to have passed boundary validation already. Fails on an
/// empty product list, or when a derived figure does not fit in a `Decimal`.
pub fn compute(
    financials: &CompanyFinancials,
    supplier: &SupplierEvaluation,
) -> CvpResult<FinancialReport> {
    if financials.products.is_empty() {
        return Err(CvpError::invalid(
            "products",
            "at least one product required",
        ));
    }

    let products = financials
        .products
        .iter()
        .map(Product::metrics)
        .collect::<CvpResult<Vec<ProductMetrics>>>()?;

    let total_sales = checked_sum(products.iter().map(|p| p.selling_price), "total_sales")?;
    let total_variable_cost =
        checked_sum(products.iter().map(|p| p.variable_cost), "total_variable_cost")?;
    let total_contribution = total_sales
        .checked_sub(total_variable_cost)
        .ok_or_else(|| CvpError::overflow("total_contribution"))?;

    let overall_pv_ratio = product::pv_ratio(total_contribution, total_sales)
        .ok_or_else(|| CvpError::overflow("overall_pv_ratio"))?;
    let break_even_point = break_even_point(financials.fixed_cost, overall_pv_ratio)?;
    let net_profit = financials
        .fixed_cost
        .checked_add(total_variable_cost)
        .and_then(|cost| total_sales.checked_sub(cost))
        .ok_or_else(|| CvpError::overflow("fixed_cost"))?;

    let stop_production: Vec<String> = products
        .iter()
        .filter(|p| p.should_stop())
        .map(|p| p.name.clone())
        .collect();

    // Non-empty checked above, so both extremes exist.
    let max_contributor = product::max_contributor(&products)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let min_contributor = product::min_contributor(&products)
        .map(|p| p.name.clone())
        .unwrap_or_default();

    let material_price_variance = supplier.material_price_variance()?;
    let variance_verdict = VarianceVerdict::from_variance(material_price_variance);

    debug!(
        company = %financials.company_name,
        products = products.len(),
        %total_sales,
        %overall_pv_ratio,
        %break_even_point,
        "computed CVP metrics"
    );

    Ok(FinancialReport {
        products,
        fixed_cost: financials.fixed_cost,
        total_sales,
        total_variable_cost,
        total_contribution,
        overall_pv_ratio,
        break_even_point,
        net_profit,
        stop_production,
        max_contributor,
        min_contributor,
        supplier: supplier.clone(),
        material_price_variance,
        variance_verdict,
    })
}

/// Sales level at which contribution covers fixed cost.
pub fn break_even_point(fixed_cost: Money, overall_pv_ratio: Percent) -> CvpResult<Money> {
    if overall_pv_ratio > dec!(0) {
        fixed_cost
            .checked_div(overall_pv_ratio / dec!(100))
            .ok_or_else(|| CvpError::overflow("break_even_point"))
    } else {
        Ok(Decimal::ZERO)
    }
}

fn checked_sum(mut values: impl Iterator<Item = Money>, field: &str) -> CvpResult<Money> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| CvpError::overflow(field))
    })
}

// ---------------------------------------------------------------------------
// Function 2: analyze
// ---------------------------------------------------------------------------

/// [`compute`] wrapped in the standard output envelope, with a warning for
/// every figure that fell back to zero instead of dividing by zero.
pub fn analyze(
    financials: &CompanyFinancials,
    supplier: &SupplierEvaluation,
) -> CvpResult<ComputationOutput<FinancialReport>> {
    let start = Instant::now();
    let report = compute(financials, supplier)?;
    let warnings = guarded_divisions(&report);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Cost-Volume-Profit Analysis with Material Price Variance",
        &serde_json::json!({
            "company": financials.company_name,
            "products": financials.products.len(),
            "fixed_cost": financials.fixed_cost.to_string(),
            "standard_price": supplier.standard_price.to_string(),
            "actual_price": supplier.actual_price.to_string(),
            "actual_quantity": supplier.actual_quantity.to_string(),
        }),
        warnings,
        elapsed,
        report,
    ))
}

fn guarded_divisions(report: &FinancialReport) -> Vec<String> {
    let mut warnings: Vec<String> = report
        .products
        .iter()
        .filter(|p| p.selling_price == dec!(0))
        .map(|p| format!("Product '{}' has a zero selling price; PV ratio set to 0", p.name))
        .collect();

    if report.total_sales == dec!(0) {
        warnings.push("Total sales are zero; overall PV ratio set to 0".to_string());
    }
    if report.overall_pv_ratio <= dec!(0) {
        warnings.push("Overall PV ratio is not positive; break-even point set to 0".to_string());
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
