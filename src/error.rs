//! Error types for linclass

use thiserror::Error;

/// Result type alias for linclass operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Model not fitted. Call train() first.")]
    NotFitted,

    #[error("Label {0} was not seen during training")]
    UnknownLabel(String),

    #[error("Unknown normalization method: {0}")]
    UnknownNormalization(String),

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl Error {
    pub(crate) fn invalid_parameter(name: &str, value: impl ToString, reason: &str) -> Self {
        Error::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
