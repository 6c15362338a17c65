use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CvpError;
use crate::types::{Money, Percent};
use crate::CvpResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A single product line with its unit selling price and variable cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product name, e.g. "Widget". Need not be unique.
    pub name: String,
    /// Selling price per unit
    pub selling_price: Money,
    /// Variable cost per unit
    pub variable_cost: Money,
}

/// Per-product contribution analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMetrics {
    pub name: String,
    pub selling_price: Money,
    pub variable_cost: Money,
    /// selling_price - variable_cost
    pub contribution: Money,
    /// contribution / selling_price * 100, zero when the price is zero
    pub pv_ratio: Percent,
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

impl Product {
    pub fn new(name: impl Into<String>, selling_price: Money, variable_cost: Money) -> Self {
        Product {
            name: name.into(),
            selling_price,
            variable_cost,
        }
    }

    pub fn contribution(&self) -> CvpResult<Money> {
        self.selling_price
            .checked_sub(self.variable_cost)
            .ok_or_else(|| self.too_large())
    }

    /// Profit/volume ratio as a percentage of the selling price.
    pub fn pv_ratio(&self) -> CvpResult<Percent> {
        pv_ratio(self.contribution()?, self.selling_price).ok_or_else(|| self.too_large())
    }

    pub fn metrics(&self) -> CvpResult<ProductMetrics> {
        Ok(ProductMetrics {
            name: self.name.clone(),
            selling_price: self.selling_price,
            variable_cost: self.variable_cost,
            contribution: self.contribution()?,
            pv_ratio: self.pv_ratio()?,
        })
    }

    fn too_large(&self) -> CvpError {
        CvpError::invalid(
            "products",
            format!("value too large for product '{}'", self.name),
        )
    }
}

impl ProductMetrics {
    /// A product that does not cover its own variable cost.
    pub fn should_stop(&self) -> bool {
        self.contribution <= dec!(0)
    }
}

/// Contribution as a percentage of sales; zero when there are no sales.
/// `None` when the ratio does not fit in a `Decimal`.
pub fn pv_ratio(contribution: Money, sales: Money) -> Option<Percent> {
    if sales > dec!(0) {
        contribution
            .checked_div(sales)
            .and_then(|r| r.checked_mul(dec!(100)))
    } else {
        Some(Decimal::ZERO)
    }
}

/// The product with the highest PV ratio. Ties keep the earliest.
pub fn max_contributor(products: &[ProductMetrics]) -> Option<&ProductMetrics> {
    products.iter().fold(None, |best: Option<&ProductMetrics>, p| match best {
        Some(b) if p.pv_ratio <= b.pv_ratio => Some(b),
        _ => Some(p),
    })
}

/// The product with the lowest PV ratio. Ties keep the earliest.
pub fn min_contributor(products: &[ProductMetrics]) -> Option<&ProductMetrics> {
    products.iter().fold(None, |worst: Option<&ProductMetrics>, p| match worst {
        Some(w) if p.pv_ratio >= w.pv_ratio => Some(w),
        _ => Some(p),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
