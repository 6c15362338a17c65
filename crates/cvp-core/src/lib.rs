pub mod config;
pub mod error;
pub mod form;
pub mod metrics;
pub mod report;
pub mod types;

#[cfg(feature = "export")]
pub mod render;

pub use error::CvpError;
pub use types::*;

/// Standard result type for all CVP operations
pub type CvpResult<T> = Result<T, CvpError>;
