use thiserror::Error;

#[derive(Debug, Error)]
pub enum CvpError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("Document export failed: {0}")]
    Export(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CvpError {
    /// Shorthand for an [`CvpError::InvalidInput`] on a named field.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CvpError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// A figure derived from `field` does not fit in a `Decimal`.
    pub fn overflow(field: impl Into<String>) -> Self {
        CvpError::invalid(field, "value too large")
    }
}

impl From<serde_json::Error> for CvpError {
    fn from(e: serde_json::Error) -> Self {
        CvpError::SerializationError(e.to_string())
    }
}
