//! Error types for notdotblur-core
//!
//! Provides a unified error type for bitmap construction and pixel access.
//! Each variant carries the values needed to diagnose the failure without
//! exposing the buffer layout.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// The byte size of a bitmap with these dimensions does not fit in memory
    #[error("invalid bitmap dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// A raw pixel buffer does not match the declared dimensions
    #[error("buffer size mismatch for {width}x{height}: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Pixel coordinates outside the bitmap
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} bitmap")]
    IndexOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
