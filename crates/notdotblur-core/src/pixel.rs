//! RGBA pixel value
//!
//! Bitmaps store pixels as four consecutive bytes in R, G, B, A order.
//! [`Pixel`] is the by-value view of one such sample.

/// Number of bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// One straight (non-premultiplied) RGBA sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Fully transparent black.
    pub const TRANSPARENT: Pixel = Pixel::new(0, 0, 0, 0);

    /// Create a pixel from its four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Pixel { r, g, b, a }
    }

    /// Create an opaque pixel (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Pixel { r, g, b, a: 255 }
    }

    /// Create an opaque gray pixel.
    #[inline]
    pub const fn gray(v: u8) -> Self {
        Pixel::rgb(v, v, v)
    }

    /// Channels in memory order.
    #[inline]
    pub const fn to_array(self) -> [u8; BYTES_PER_PIXEL] {
        [self.r, self.g, self.b, self.a]
    }

    /// Read a pixel from the first four bytes of `bytes`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is shorter than four bytes.
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

impl From<[u8; BYTES_PER_PIXEL]> for Pixel {
    fn from([r, g, b, a]: [u8; BYTES_PER_PIXEL]) -> Self {
        Pixel { r, g, b, a }
    }
}

impl From<Pixel> for [u8; BYTES_PER_PIXEL] {
    fn from(p: Pixel) -> Self {
        p.to_array()
    }
}
