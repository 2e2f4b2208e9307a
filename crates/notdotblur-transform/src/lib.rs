//! notdotblur-transform - Pixel-replication scaling for NotDotBlur
//!
//! This crate provides the one geometric transform NotDotBlur needs:
//! integer enlargement where each source pixel becomes an `f` x `f` block.
//!
//! - [`scale`] / [`scale_with_limits`] - sequential enlargement
//! - [`scale_parallel`] - row bands filled on the rayon pool (feature `parallel`)
//! - [`expand_replicate`] - enlargement from an unvalidated integer factor
//! - [`output_dimensions`] - checked output size arithmetic
//!
//! The transform is pure: no I/O, no logging, no shared state.

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
#[cfg(feature = "parallel")]
pub use scale::scale_parallel;
pub use scale::{
    DEFAULT_MAX_OUTPUT_BYTES, ScaleFactor, ScaleLimits, expand_replicate, output_dimensions,
    scale, scale_with_limits,
};
