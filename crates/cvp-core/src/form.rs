//! The input boundary: one atomic form submission, validated before any
//! figure is computed.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::CvpError;
use crate::metrics::{CompanyFinancials, Product, SupplierEvaluation};
use crate::types::{Money, Quantity};
use crate::CvpResult;

/// A product row as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub selling_price: Money,
    pub variable_cost: Money,
}

/// Supplier inputs as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierEntry {
    pub standard_price: Money,
    pub actual_price: Money,
    pub actual_quantity: Quantity,
}

/// Everything the user submits in one go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub company_name: String,
    /// Number of products declared up front. Defaults to the number of rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<usize>,
    pub fixed_cost: Money,
    pub products: Vec<ProductEntry>,
    pub supplier: SupplierEntry,
}

/// Validated inputs ready for the metrics engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub financials: CompanyFinancials,
    pub supplier: SupplierEvaluation,
}

impl FormSubmission {
    /// Check structure and non-negativity, then split into engine inputs.
    pub fn validate(self) -> CvpResult<ValidatedSubmission> {
        if self.company_name.trim().is_empty() {
            return Err(CvpError::invalid("company_name", "Company name is required"));
        }

        let declared = self.product_count.unwrap_or(self.products.len());
        if declared < 1 {
            return Err(CvpError::invalid(
                "product_count",
                "at least one product required",
            ));
        }
        if declared != self.products.len() {
            return Err(CvpError::invalid(
                "products",
                format!(
                    "expected {} products, got {}",
                    declared,
                    self.products.len()
                ),
            ));
        }

        non_negative("fixed_cost", self.fixed_cost)?;

        for (i, p) in self.products.iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(CvpError::invalid(
                    format!("products[{}].name", i),
                    "Product name is required",
                ));
            }
            non_negative(&format!("products[{}].selling_price", i), p.selling_price)?;
            non_negative(&format!("products[{}].variable_cost", i), p.variable_cost)?;
        }

        non_negative("supplier.standard_price", self.supplier.standard_price)?;
        non_negative("supplier.actual_price", self.supplier.actual_price)?;
        non_negative("supplier.actual_quantity", self.supplier.actual_quantity)?;

        let products = self
            .products
            .into_iter()
            .map(|p| Product::new(p.name.trim(), p.selling_price, p.variable_cost))
            .collect();

        Ok(ValidatedSubmission {
            financials: CompanyFinancials {
                company_name: self.company_name.trim().to_string(),
                fixed_cost: self.fixed_cost,
                products,
            },
            supplier: SupplierEvaluation {
                standard_price: self.supplier.standard_price,
                actual_price: self.supplier.actual_price,
                actual_quantity: self.supplier.actual_quantity,
            },
        })
    }
}

fn non_negative(field: &str, value: Money) -> CvpResult<()> {
    if value < dec!(0) {
        return Err(CvpError::invalid(field, "must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> FormSubmission {
        FormSubmission {
            company_name: "Acme Industries".to_string(),
            product_count: Some(2),
            fixed_cost: dec!(200),
            products: vec![
                ProductEntry {
                    name: "A".to_string(),
                    selling_price: dec!(100),
                    variable_cost: dec!(40),
                },
                ProductEntry {
                    name: "B".to_string(),
                    selling_price: dec!(50),
                    variable_cost: dec!(50),
                },
            ],
            supplier: SupplierEntry {
                standard_price: dec!(10),
                actual_price: dec!(12),
                actual_quantity: dec!(100),
            },
        }
    }

    fn rejected_field(sub: FormSubmission) -> String {
        match sub.validate() {
            Err(CvpError::InvalidInput { field, .. }) => field,
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_submission_splits_into_engine_inputs() {
        let v = submission().validate().unwrap();
        assert_eq!(v.financials.products.len(), 2);
        assert_eq!(v.financials.fixed_cost, dec!(200));
        assert_eq!(v.supplier.actual_quantity, dec!(100));
    }

    #[test]
    fn test_missing_count_defaults_to_rows() {
        let mut sub = submission();
        sub.product_count = None;
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn test_blank_company_name_rejected() {
        let mut sub = submission();
        sub.company_name = "   ".to_string();
        assert_eq!(rejected_field(sub), "company_name");
    }

    #[test]
    fn test_zero_product_count_rejected() {
        let mut sub = submission();
        sub.product_count = Some(0);
        sub.products.clear();
        assert_eq!(rejected_field(sub), "product_count");
    }

    #[test]
    fn test_count_mismatch_rejected() {
        let mut sub = submission();
        sub.product_count = Some(3);
        assert_eq!(rejected_field(sub), "products");
    }

    #[test]
    fn test_blank_product_name_rejected() {
        let mut sub = submission();
        sub.products[1].name = String::new();
        assert_eq!(rejected_field(sub), "products[1].name");
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut sub = submission();
        sub.products[0].variable_cost = dec!(-1);
        assert_eq!(rejected_field(sub), "products[0].variable_cost");

        let mut sub = submission();
        sub.fixed_cost = dec!(-0.01);
        assert_eq!(rejected_field(sub), "fixed_cost");

        let mut sub = submission();
        sub.supplier.actual_quantity = dec!(-5);
        assert_eq!(rejected_field(sub), "supplier.actual_quantity");
    }

    #[test]
    fn test_deserializes_from_string_decimals() {
        let json = r#"{
            "company_name": "Acme",
            "fixed_cost": "200",
            "products": [{"name": "A", "selling_price": "100", "variable_cost": "40"}],
            "supplier": {"standard_price": "10", "actual_price": "12", "actual_quantity": "100"}
        }"#;
        let sub: FormSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(sub.product_count, None);
        assert_eq!(sub.products[0].selling_price, dec!(100));
    }
}
