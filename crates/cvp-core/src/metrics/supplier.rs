use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CvpError;
use crate::types::{Money, Quantity};
use crate::CvpResult;

/// Standard vs actual material pricing for one supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierEvaluation {
    /// Budgeted price per unit of material
    pub standard_price: Money,
    /// Price actually paid per unit
    pub actual_price: Money,
    /// Units actually purchased
    pub actual_quantity: Quantity,
}

/// Direction of a cost variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceVerdict {
    Favourable,
    Unfavourable,
}

impl SupplierEvaluation {
    /// (standard - actual) * quantity. Positive means the supplier was cheaper
    /// than standard.
    pub fn material_price_variance(&self) -> CvpResult<Money> {
        self.standard_price
            .checked_sub(self.actual_price)
            .and_then(|diff| diff.checked_mul(self.actual_quantity))
            .ok_or_else(|| CvpError::overflow("supplier"))
    }

    pub fn verdict(&self) -> CvpResult<VarianceVerdict> {
        self.material_price_variance().map(VarianceVerdict::from_variance)
    }
}

impl VarianceVerdict {
    /// A zero variance counts as favourable.
    pub fn from_variance(variance: Money) -> Self {
        if variance >= dec!(0) {
            VarianceVerdict::Favourable
        } else {
            VarianceVerdict::Unfavourable
        }
    }

    pub fn is_favourable(self) -> bool {
        self == VarianceVerdict::Favourable
    }

    pub fn label(self) -> &'static str {
        match self {
            VarianceVerdict::Favourable => "favourable",
            VarianceVerdict::Unfavourable => "unfavourable",
        }
    }
}

impl std::fmt::Display for VarianceVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
