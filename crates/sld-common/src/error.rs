//! Error types for style generation.

use thiserror::Error;

/// Result type alias using StyleError.
pub type StyleResult<T> = Result<T, StyleError>;

/// Primary error type for style generation.
///
/// Every variant is raised synchronously by the call that detected it; a
/// failing call never yields a partial document.
#[derive(Debug, Error)]
pub enum StyleError {
    // === Caller input errors ===
    #[error("Invalid color ramp: {0}")]
    InvalidRamp(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Data errors ===
    #[error("Unreadable raster: {0}")]
    UnreadableRaster(String),

    // === API misuse ===
    #[error("Nothing to classify: {0}")]
    EmptyClassification(String),

    #[error("Ramp size mismatch: expected {expected} colors, got {actual}")]
    RampSizeMismatch { expected: usize, actual: usize },

    // === Output errors ===
    #[error("Failed to serialize style document: {0}")]
    Serialization(String),
}

impl StyleError {
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        StyleError::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code, used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            StyleError::InvalidRamp(_) => "invalid_ramp",
            StyleError::InvalidParameter { .. } => "invalid_parameter",
            StyleError::UnreadableRaster(_) => "unreadable_raster",
            StyleError::EmptyClassification(_) => "empty_classification",
            StyleError::RampSizeMismatch { .. } => "ramp_size_mismatch",
            StyleError::Serialization(_) => "serialization",
        }
    }

    /// Whether retrying the same call after fixing the environment can succeed.
    ///
    /// Only raster I/O failures qualify; everything else is a caller error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StyleError::UnreadableRaster(_))
    }
}

impl From<std::io::Error> for StyleError {
    fn from(err: std::io::Error) -> Self {
        StyleError::UnreadableRaster(err.to_string())
    }
}

impl From<serde_json::Error> for StyleError {
    fn from(err: serde_json::Error) -> Self {
        StyleError::invalid_parameter("json", err.to_string())
    }
}
