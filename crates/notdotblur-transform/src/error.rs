//! Error types for notdotblur-transform

use thiserror::Error;

/// Errors that can occur while scaling a bitmap
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] notdotblur_core::Error),

    /// Scale factor below 1, or a bitmap with no pixels
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Output width, height or byte size is not representable
    #[error("output dimensions overflow: {width}x{height} scaled by {factor}")]
    DimensionOverflow { width: u32, height: u32, factor: u32 },

    /// Output buffer would exceed the configured memory ceiling
    #[error("output of {bytes} bytes exceeds the limit of {limit} bytes")]
    OutputTooLarge { bytes: usize, limit: usize },
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
