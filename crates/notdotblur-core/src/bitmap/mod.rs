//! Bitmap - The RGBA image container
//!
//! The `Bitmap` structure is the image type passed between the decoders,
//! the scaler and the PNG encoder.
//!
//! # Pixel layout
//!
//! - Every pixel is four bytes: red, green, blue, alpha
//! - Rows are stored top to bottom with no padding
//! - The stride (bytes per row) is always `width * 4`
//!
//! # Ownership model
//!
//! `Bitmap` uses `Arc` for cheap cloning (shared, read-only ownership).
//! To modify pixel data, convert to `BitmapMut` via [`Bitmap::try_into_mut`]
//! or [`Bitmap::to_mut`], then convert back with `Into<Bitmap>`.

mod access;

use crate::error::{Error, Result};
use crate::pixel::{BYTES_PER_PIXEL, Pixel};
use std::sync::Arc;

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Not decoded from a file
    #[default]
    Unknown,
    /// PNG format
    Png,
    /// JFIF JPEG format
    Jpeg,
    /// GIF format
    Gif,
    /// Windows BMP format
    Bmp,
}

impl ImageFormat {
    /// Formats that can be decoded.
    pub const SUPPORTED: [ImageFormat; 4] = [Self::Png, Self::Jpeg, Self::Gif, Self::Bmp];

    /// Look up a format by file extension.
    ///
    /// The match is case-insensitive and accepts `png`, `jpg`, `jpeg`,
    /// `gif` and `bmp`. A leading dot is ignored.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => "dat",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    /// Get the MIME type for this format.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Unknown => "application/octet-stream",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

/// Compute the buffer length for a `width` x `height` RGBA bitmap.
///
/// Returns `None` if the byte count does not fit in `usize`.
#[inline]
pub fn buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// Internal bitmap data
#[derive(Debug, Clone, PartialEq, Eq)]
struct BitmapData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Format the pixels were decoded from
    informat: ImageFormat,
    /// RGBA bytes, row-major, `width * height * 4` long
    data: Vec<u8>,
}

impl BitmapData {
    fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height).ok_or(Error::InvalidDimension { width, height })?;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(BitmapData {
            width,
            height,
            informat: ImageFormat::Unknown,
            data,
        })
    }
}

/// Bitmap - Main image container
///
/// Holds `width * height` RGBA pixels. Cloning shares the pixel buffer.
///
/// A zero-area bitmap (width or height of 0, empty buffer) can be
/// constructed; operations that need pixels reject it.
///
/// # Examples
///
/// ```
/// use notdotblur_core::{Bitmap, Pixel};
///
/// let bitmap = Bitmap::new(64, 48).unwrap();
/// assert_eq!(bitmap.width(), 64);
/// assert_eq!(bitmap.height(), 48);
/// assert_eq!(bitmap.pixel(0, 0), Some(Pixel::TRANSPARENT));
/// ```
#[derive(Debug, Clone)]
pub struct Bitmap {
    inner: Arc<BitmapData>,
}

impl Bitmap {
    /// Create a new bitmap with every pixel set to transparent black.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the buffer size overflows `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height).ok_or(Error::InvalidDimension { width, height })?;
        Self::from_raw(width, height, vec![0u8; len])
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `data.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Ok(Bitmap {
            inner: Arc::new(BitmapData::from_raw(width, height, data)?),
        })
    }

    /// Build a bitmap from a slice of pixels in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `pixels.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Pixel]) -> Result<Self> {
        let data = pixels.iter().flat_map(|p| p.to_array()).collect();
        Self::from_raw(width, height, data)
    }

    /// Get the bitmap width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the bitmap height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.inner.width, self.inner.height)
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.width as usize * BYTES_PER_PIXEL
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.width as usize * self.inner.height as usize
    }

    /// Check whether the bitmap has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.width == 0 || self.inner.height == 0
    }

    /// Get the format this bitmap was decoded from.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Get the raw RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the number of `Bitmap` handles sharing this buffer.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Take the raw buffer, copying only if it is shared.
    pub fn into_raw(self) -> Vec<u8> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => data.data,
            Err(arc) => arc.data.clone(),
        }
    }

    /// Try to take exclusive ownership for mutation.
    ///
    /// Fails (returning `self`) if other handles share the buffer.
    pub fn try_into_mut(self) -> std::result::Result<BitmapMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(BitmapMut { inner: data }),
            Err(arc) => Err(Bitmap { inner: arc }),
        }
    }

    /// Create a mutable copy of this bitmap.
    pub fn to_mut(&self) -> BitmapMut {
        BitmapMut {
            inner: (*self.inner).clone(),
        }
    }

    /// Check if two bitmaps have the same width and height.
    pub fn sizes_equal(&self, other: &Bitmap) -> bool {
        self.dimensions() == other.dimensions()
    }
}

impl PartialEq for Bitmap {
    /// Two bitmaps are equal when their dimensions and pixels match.
    /// The source format is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.sizes_equal(other) && self.data() == other.data()
    }
}

impl Eq for Bitmap {}

/// Mutable bitmap with exclusive ownership of its buffer.
#[derive(Debug)]
pub struct BitmapMut {
    inner: BitmapData,
}

impl BitmapMut {
    /// Create a new transparent bitmap for writing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the buffer size overflows `usize`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height).ok_or(Error::InvalidDimension { width, height })?;
        Self::from_raw(width, height, vec![0u8; len])
    }

    /// Wrap an existing RGBA buffer for writing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `data.len() != width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Ok(BitmapMut {
            inner: BitmapData::from_raw(width, height, data)?,
        })
    }

    /// Get the bitmap width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the bitmap height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.width as usize * BYTES_PER_PIXEL
    }

    /// Get the format this bitmap was decoded from.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Record the format the pixels were decoded from.
    pub fn set_informat(&mut self, format: ImageFormat) {
        self.inner.informat = format;
    }

    /// Get the raw RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the raw RGBA bytes for writing.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Set every pixel to `pixel`.
    pub fn fill(&mut self, pixel: Pixel) {
        let bytes = pixel.to_array();
        for chunk in self.inner.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            chunk.copy_from_slice(&bytes);
        }
    }
}

impl From<BitmapMut> for Bitmap {
    fn from(bitmap_mut: BitmapMut) -> Self {
        Bitmap {
            inner: Arc::new(bitmap_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("Jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension(".gif"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_extension("BMP"), Some(ImageFormat::Bmp));
        assert_eq!(ImageFormat::from_extension("tiff"), None);
        assert_eq!(ImageFormat::from_extension(""), None);
    }

    #[test]
    fn test_format_extension_and_mime() {
        for format in ImageFormat::SUPPORTED {
            assert_eq!(ImageFormat::from_extension(format.extension()), Some(format));
            assert!(format.mime_type().starts_with("image/"));
        }
    }

    #[test]
    fn test_bitmap_creation() {
        let bitmap = Bitmap::new(100, 200).unwrap();
        assert_eq!(bitmap.dimensions(), (100, 200));
        assert_eq!(bitmap.stride(), 400);
        assert_eq!(bitmap.data().len(), 100 * 200 * 4);
        assert_eq!(bitmap.pixel_count(), 20_000);
        assert!(!bitmap.is_empty());
        assert_eq!(bitmap.informat(), ImageFormat::Unknown);
    }

    #[test]
    fn test_bitmap_zero_area() {
        let bitmap = Bitmap::from_raw(0, 5, Vec::new()).unwrap();
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.pixel_count(), 0);
    }

    #[test]
    fn test_bitmap_from_raw_mismatch() {
        let err = Bitmap::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferSizeMismatch {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn test_bitmap_clone_shares_data() {
        let b1 = Bitmap::new(10, 10).unwrap();
        let b2 = b1.clone();
        assert_eq!(b1.ref_count(), 2);
        assert_eq!(b1.data().as_ptr(), b2.data().as_ptr());
        assert!(b1.try_into_mut().is_err());
    }

    #[test]
    fn test_bitmap_to_mut_copies() {
        let b1 = Bitmap::new(4, 4).unwrap();
        let mut m = b1.to_mut();
        m.fill(Pixel::rgb(1, 2, 3));
        let b2: Bitmap = m.into();
        assert_eq!(b1.pixel(0, 0), Some(Pixel::TRANSPARENT));
        assert_eq!(b2.pixel(3, 3), Some(Pixel::rgb(1, 2, 3)));
        assert_ne!(b1, b2);
    }

    #[test]
    fn test_bitmap_into_raw() {
        let b = Bitmap::from_pixels(1, 1, &[Pixel::new(5, 6, 7, 8)]).unwrap();
        let shared = b.clone();
        assert_eq!(b.into_raw(), vec![5, 6, 7, 8]);
        assert_eq!(shared.into_raw(), vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_bitmap_equality_ignores_informat() {
        let b1 = Bitmap::new(3, 2).unwrap();
        let mut m = b1.to_mut();
        m.set_informat(ImageFormat::Gif);
        let b2: Bitmap = m.into();
        assert_eq!(b2.informat(), ImageFormat::Gif);
        assert_eq!(b1, b2);
    }

    #[test]
    fn test_buffer_len_overflow() {
        assert_eq!(buffer_len(3, 5), Some(60));
        if usize::BITS == 32 {
            assert_eq!(buffer_len(u32::MAX, 2), None);
        } else {
            assert!(buffer_len(u32::MAX, u32::MAX).is_none());
        }
    }
}
