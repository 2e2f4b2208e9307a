//! NotDotBlur Core - Bitmap data structures
//!
//! This crate provides the data structures shared by the rest of the
//! workspace:
//!
//! - [`Bitmap`] / [`BitmapMut`] - RGBA image container (shared / exclusive)
//! - [`Pixel`] - One RGBA sample
//! - [`ImageFormat`] - Recognised input file formats

pub mod bitmap;
pub mod error;
pub mod pixel;

pub use bitmap::{Bitmap, BitmapMut, ImageFormat, buffer_len};
pub use error::{Error, Result};
pub use pixel::{BYTES_PER_PIXEL, Pixel};
