//! Pixel-replication scaling
//!
//! Enlarges a bitmap by an integer factor `f`: every source pixel becomes an
//! `f` x `f` block of identical pixels. Channels are copied bit for bit, so
//! hard pixel-art edges stay hard.
//!
//! | function | input factor |
//! |---|---|
//! | `scale` | validated [`ScaleFactor`], default [`ScaleLimits`] |
//! | `scale_with_limits` | validated [`ScaleFactor`], caller's limits |
//! | `scale_parallel` | as `scale_with_limits`, rows filled on the rayon pool |
//! | `expand_replicate` | raw integer, validated here |

use crate::{TransformError, TransformResult};
use notdotblur_core::{BYTES_PER_PIXEL, Bitmap, BitmapMut, buffer_len};
use std::fmt;
use std::num::NonZeroU32;

/// Default ceiling on the output buffer: 1 GiB.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1 << 30;

/// Integer scale factor, always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScaleFactor(NonZeroU32);

impl ScaleFactor {
    /// The identity factor.
    pub const ONE: ScaleFactor = ScaleFactor(NonZeroU32::MIN);

    /// Validate a raw factor.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidArgument`] if `value < 1` or
    /// `value > u32::MAX`.
    pub fn new(value: i64) -> TransformResult<Self> {
        if value < 1 {
            return Err(TransformError::InvalidArgument(format!(
                "scale factor must be an integer of 1 or greater, got {}",
                value
            )));
        }
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(ScaleFactor)
            .ok_or_else(|| {
                TransformError::InvalidArgument(format!("scale factor {} is too large", value))
            })
    }

    /// Get the factor as an integer.
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl From<NonZeroU32> for ScaleFactor {
    fn from(value: NonZeroU32) -> Self {
        ScaleFactor(value)
    }
}

impl TryFrom<i64> for ScaleFactor {
    type Error = TransformError;

    fn try_from(value: i64) -> TransformResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<i32> for ScaleFactor {
    type Error = TransformError;

    fn try_from(value: i32) -> TransformResult<Self> {
        Self::new(i64::from(value))
    }
}

impl TryFrom<u32> for ScaleFactor {
    type Error = TransformError;

    fn try_from(value: u32) -> TransformResult<Self> {
        Self::new(i64::from(value))
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Memory ceiling applied before the output buffer is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleLimits {
    /// Largest output buffer in bytes, or `None` for no ceiling
    pub max_output_bytes: Option<usize>,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        ScaleLimits {
            max_output_bytes: Some(DEFAULT_MAX_OUTPUT_BYTES),
        }
    }
}

impl ScaleLimits {
    /// Limit the output buffer to `max_output_bytes`.
    pub fn new(max_output_bytes: usize) -> Self {
        ScaleLimits {
            max_output_bytes: Some(max_output_bytes),
        }
    }

    /// No ceiling. Dimension overflow is still rejected.
    pub fn unlimited() -> Self {
        ScaleLimits {
            max_output_bytes: None,
        }
    }

    /// Check an output size against the ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::OutputTooLarge`] if `bytes` exceeds the limit.
    pub fn check(&self, bytes: usize) -> TransformResult<()> {
        match self.max_output_bytes {
            Some(limit) if bytes > limit => Err(TransformError::OutputTooLarge { bytes, limit }),
            _ => Ok(()),
        }
    }
}

/// Compute the output width, height and buffer length for a scale.
///
/// # Errors
///
/// - [`TransformError::InvalidArgument`] if `width` or `height` is 0
/// - [`TransformError::DimensionOverflow`] if a dimension overflows `u32`
///   or the byte length overflows `usize`
pub fn output_dimensions(
    width: u32,
    height: u32,
    factor: ScaleFactor,
) -> TransformResult<(u32, u32, usize)> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidArgument(format!(
            "bitmap has no pixels: {}x{}",
            width, height
        )));
    }
    let f = factor.get();
    let overflow = move || TransformError::DimensionOverflow {
        width,
        height,
        factor: f,
    };
    let out_w = width.checked_mul(f).ok_or_else(overflow)?;
    let out_h = height.checked_mul(f).ok_or_else(overflow)?;
    let len = buffer_len(out_w, out_h).ok_or_else(overflow)?;
    Ok((out_w, out_h, len))
}

/// Enlarge `bitmap` by `factor` under the default memory ceiling.
///
/// Each source pixel (x, y) is copied to every output pixel
/// (x * f + dx, y * f + dy) with dx, dy in `0..f`. A factor of 1
/// returns an identical copy.
///
/// # Errors
///
/// See [`scale_with_limits`].
///
/// # Examples
///
/// ```
/// use notdotblur_core::{Bitmap, Pixel};
/// use notdotblur_transform::{ScaleFactor, scale};
///
/// let red = Pixel::rgb(255, 0, 0);
/// let src = Bitmap::from_pixels(1, 1, &[red]).unwrap();
/// let out = scale(&src, ScaleFactor::new(3).unwrap()).unwrap();
/// assert_eq!(out.dimensions(), (3, 3));
/// assert_eq!(out.pixel(2, 2), Some(red));
/// ```
pub fn scale(bitmap: &Bitmap, factor: ScaleFactor) -> TransformResult<Bitmap> {
    scale_with_limits(bitmap, factor, &ScaleLimits::default())
}

/// Enlarge `bitmap` by `factor` under explicit limits.
///
/// # Errors
///
/// - [`TransformError::InvalidArgument`] if the bitmap has no pixels
/// - [`TransformError::DimensionOverflow`] if the output size is not representable
/// - [`TransformError::OutputTooLarge`] if the output exceeds `limits`
pub fn scale_with_limits(
    bitmap: &Bitmap,
    factor: ScaleFactor,
    limits: &ScaleLimits,
) -> TransformResult<Bitmap> {
    let (out_w, out_h, len) = output_dimensions(bitmap.width(), bitmap.height(), factor)?;
    limits.check(len)?;

    let f = factor.get() as usize;
    let band_len = bitmap.stride() * f * f;
    let mut data = vec![0u8; len];
    for (src_row, band) in bitmap.rows().zip(data.chunks_exact_mut(band_len)) {
        replicate_band(src_row, band, f);
    }

    finish(bitmap, out_w, out_h, data)
}

/// Enlarge `bitmap` by `factor`, filling output rows in parallel.
///
/// The output for each source row is a disjoint band of `f` rows, so bands
/// are written concurrently without locking. The result is byte-identical
/// to [`scale_with_limits`].
///
/// # Errors
///
/// See [`scale_with_limits`].
#[cfg(feature = "parallel")]
pub fn scale_parallel(
    bitmap: &Bitmap,
    factor: ScaleFactor,
    limits: &ScaleLimits,
) -> TransformResult<Bitmap> {
    use rayon::prelude::*;

    let (out_w, out_h, len) = output_dimensions(bitmap.width(), bitmap.height(), factor)?;
    limits.check(len)?;

    let f = factor.get() as usize;
    let band_len = bitmap.stride() * f * f;
    let mut data = vec![0u8; len];
    data.par_chunks_exact_mut(band_len)
        .zip(bitmap.data().par_chunks_exact(bitmap.stride()))
        .for_each(|(band, src_row)| replicate_band(src_row, band, f));

    finish(bitmap, out_w, out_h, data)
}

/// Validate a raw integer factor, then [`scale`].
///
/// # Errors
///
/// Returns [`TransformError::InvalidArgument`] for `factor < 1`, plus the
/// errors of [`scale`].
pub fn expand_replicate(bitmap: &Bitmap, factor: i64) -> TransformResult<Bitmap> {
    scale(bitmap, ScaleFactor::new(factor)?)
}

/// Fill one band of `factor` output rows from one source row.
///
/// The first output row is built pixel by pixel; the remaining rows are
/// copies of it.
fn replicate_band(src_row: &[u8], band: &mut [u8], factor: usize) {
    let dst_stride = src_row.len() * factor;
    let block = BYTES_PER_PIXEL * factor;
    let (first, rest) = band.split_at_mut(dst_stride);

    for (src_px, dst_block) in src_row
        .chunks_exact(BYTES_PER_PIXEL)
        .zip(first.chunks_exact_mut(block))
    {
        for dst_px in dst_block.chunks_exact_mut(BYTES_PER_PIXEL) {
            dst_px.copy_from_slice(src_px);
        }
    }

    for dst_row in rest.chunks_exact_mut(dst_stride) {
        dst_row.copy_from_slice(first);
    }
}

fn finish(src: &Bitmap, width: u32, height: u32, data: Vec<u8>) -> TransformResult<Bitmap> {
    let mut out = BitmapMut::from_raw(width, height, data)?;
    out.set_informat(src.informat());
    Ok(out.into())
}
