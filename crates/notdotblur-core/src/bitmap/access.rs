//! Pixel and row access
//!
//! Byte offsets follow the packed layout: pixel (x, y) starts at
//! `y * stride + x * 4`.

use super::{Bitmap, BitmapMut};
use crate::error::{Error, Result};
use crate::pixel::{BYTES_PER_PIXEL, Pixel};

#[inline]
fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * BYTES_PER_PIXEL
}

impl Bitmap {
    /// Get the pixel at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let offset = pixel_offset(self.width(), x, y);
        Some(Pixel::from_slice(&self.data()[offset..offset + BYTES_PER_PIXEL]))
    }

    /// Get the bytes of row `y`.
    ///
    /// Returns `None` if `y` is out of bounds.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height() {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        Some(&self.data()[start..start + stride])
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact panics on a zero chunk size
        let stride = self.stride().max(1);
        self.data().chunks_exact(stride)
    }
}

impl BitmapMut {
    /// Get the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let offset = pixel_offset(self.width(), x, y);
        Some(Pixel::from_slice(&self.data()[offset..offset + BYTES_PER_PIXEL]))
    }

    /// Set the pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        self.set_pixel_unchecked(x, y, pixel);
        Ok(())
    }

    /// Set the pixel at (x, y) without a bounds check on the coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset falls outside the buffer.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, pixel: Pixel) {
        let offset = pixel_offset(self.width(), x, y);
        self.data_mut()[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&pixel.to_array());
    }

    /// Get the bytes of row `y` for writing.
    ///
    /// Returns `None` if `y` is out of bounds.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [u8]> {
        if y >= self.height() {
            return None;
        }
        let stride = self.stride();
        let start = y as usize * stride;
        Some(&mut self.data_mut()[start..start + stride])
    }
}
