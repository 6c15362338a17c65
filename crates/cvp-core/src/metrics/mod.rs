pub mod engine;
pub mod product;
pub mod supplier;

pub use engine::{analyze, compute, CompanyFinancials, FinancialReport};
pub use product::{Product, ProductMetrics};
pub use supplier::{SupplierEvaluation, VarianceVerdict};
