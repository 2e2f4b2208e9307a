//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Grayscale, RGB and
//! CMYK images are all expanded to opaque RGBA. JPEG is input-only; the
//! enlarged image is always written as PNG.

use crate::{IoError, IoResult};
use jpeg_decoder::{Decoder, PixelFormat};
use notdotblur_core::{BYTES_PER_PIXEL, Bitmap, BitmapMut, ImageFormat};
use std::io::Read;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Bitmap> {
    let mut decoder = Decoder::new(reader);
    let data = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);
    #[allow(unreachable_patterns)]
    let samples = match info.pixel_format {
        PixelFormat::L8 => 1,
        PixelFormat::L16 => 2,
        PixelFormat::RGB24 => 3,
        PixelFormat::CMYK32 => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported JPEG pixel format: {:?}",
                other
            )));
        }
    };

    let expected = width as usize * height as usize * samples;
    if data.len() < expected {
        return Err(IoError::InvalidData(format!(
            "JPEG pixel data too short: {} < {}",
            data.len(),
            expected
        )));
    }

    let mut bitmap = BitmapMut::new(width, height)?;
    bitmap.set_informat(ImageFormat::Jpeg);

    for (src, dst) in data
        .chunks_exact(samples)
        .zip(bitmap.data_mut().chunks_exact_mut(BYTES_PER_PIXEL))
    {
        let rgba = match *src {
            [l] => [l, l, l, 255],
            // L16 samples are big-endian; keep the high byte
            [hi, _] => [hi, hi, hi, 255],
            [r, g, b] => [r, g, b, 255],
            [c, m, y, k] => {
                let (r, g, b) = cmyk_to_rgb(c, m, y, k);
                [r, g, b, 255]
            }
            _ => unreachable!(),
        };
        dst.copy_from_slice(&rgba);
    }

    Ok(bitmap.into())
}

/// Convert one CMYK sample (0 = no ink) to RGB.
fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> (u8, u8, u8) {
    let white = 255 - u32::from(k);
    let channel = |v: u8| ((255 - u32::from(v)) * white / 255) as u8;
    (channel(c), channel(m), channel(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmyk_to_rgb() {
        assert_eq!(cmyk_to_rgb(0, 0, 0, 0), (255, 255, 255));
        assert_eq!(cmyk_to_rgb(0, 0, 0, 255), (0, 0, 0));
        assert_eq!(cmyk_to_rgb(255, 0, 0, 0), (0, 255, 255));
    }

    #[test]
    fn test_jpeg_read_garbage() {
        let data = [0xFF, 0xD8, 0xFF, 0x00, 0x01, 0x02];
        assert!(matches!(
            read_jpeg(&data[..]),
            Err(IoError::DecodeError(_))
        ));
    }
}
