//! File-to-file enlargement
//!
//! Ties decoding, scaling and PNG encoding together for one input file.

use crate::io::{self, IoError};
use crate::transform::{ScaleFactor, ScaleLimits, TransformError};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from [`enlarge_file`]
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading, decoding, encoding or writing failed
    #[error(transparent)]
    Io(#[from] IoError),

    /// Scaling failed
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Settings for one enlargement
#[derive(Debug, Clone, Copy)]
pub struct EnlargeOptions {
    /// Block size each source pixel becomes
    pub factor: ScaleFactor,
    /// Memory ceiling for the output buffer
    pub limits: ScaleLimits,
    /// Fill output rows on the rayon pool
    pub parallel: bool,
}

impl Default for EnlargeOptions {
    fn default() -> Self {
        EnlargeOptions {
            factor: ScaleFactor::ONE,
            limits: ScaleLimits::default(),
            parallel: cfg!(feature = "parallel"),
        }
    }
}

/// Outcome of a successful [`enlarge_file`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enlarged {
    /// Where the PNG was written
    pub output: PathBuf,
    /// Source width and height
    pub source: (u32, u32),
    /// Enlarged width and height
    pub target: (u32, u32),
}

/// Decode `input`, enlarge it and write the result as PNG.
///
/// When `output` is `None` the file is written next to the input as
/// `{stem}-x{factor}-{width}x{height}.png`. Nothing is written if any step
/// fails; the PNG replaces the output path in a single rename.
///
/// The decoder is chosen by extension. Only a path with no extension is
/// identified by its leading bytes; an unrecognised extension is rejected
/// before the file is read.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] for unreadable, empty, unsupported or
/// corrupt input and for write failures, and [`PipelineError::Transform`]
/// for an output that cannot be represented or exceeds `options.limits`.
pub fn enlarge_file(
    input: &Path,
    output: Option<&Path>,
    options: &EnlargeOptions,
) -> Result<Enlarged, PipelineError> {
    let bitmap = io::read_image_auto(input)?;
    let source = bitmap.dimensions();

    let enlarged = scale(&bitmap, options)?;
    let (width, height) = enlarged.dimensions();
    debug!(width, height, parallel = options.parallel, "enlarged");

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => io::default_output_path(input, options.factor.get(), width, height),
    };
    io::write_image(&enlarged, &output)?;

    Ok(Enlarged {
        output,
        source,
        target: (width, height),
    })
}

#[cfg(feature = "parallel")]
fn scale(
    bitmap: &crate::Bitmap,
    options: &EnlargeOptions,
) -> Result<crate::Bitmap, TransformError> {
    if options.parallel {
        crate::transform::scale_parallel(bitmap, options.factor, &options.limits)
    } else {
        crate::transform::scale_with_limits(bitmap, options.factor, &options.limits)
    }
}

#[cfg(not(feature = "parallel"))]
fn scale(
    bitmap: &crate::Bitmap,
    options: &EnlargeOptions,
) -> Result<crate::Bitmap, TransformError> {
    crate::transform::scale_with_limits(bitmap, options.factor, &options.limits)
}
