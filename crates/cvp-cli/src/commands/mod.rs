pub mod form;
pub mod metrics;
pub mod report;
