//! PNG image format support
//!
//! Reading accepts every PNG colour type and bit depth; the decoder expands
//! palettes and transparency chunks and strips 16-bit samples to 8 bits.
//! Writing always produces 8-bit RGBA, the only output format.

use crate::{IoError, IoResult};
use notdotblur_core::{BYTES_PER_PIXEL, Bitmap, BitmapMut, ImageFormat};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Bitmap> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    if output_info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unexpected PNG output depth: {:?}",
            output_info.bit_depth
        )));
    }

    let samples = match output_info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "PNG palette was not expanded".to_string(),
            ));
        }
    };

    let width = output_info.width;
    let height = output_info.height;
    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    let mut bitmap = BitmapMut::new(width, height)?;
    bitmap.set_informat(ImageFormat::Png);
    let stride = bitmap.stride();

    for (src_row, dst_row) in data
        .chunks(bytes_per_row)
        .zip(bitmap.data_mut().chunks_exact_mut(stride))
    {
        for (src, dst) in src_row
            .chunks_exact(samples)
            .zip(dst_row.chunks_exact_mut(BYTES_PER_PIXEL))
        {
            let rgba = match *src {
                [v] => [v, v, v, 255],
                [v, a] => [v, v, v, a],
                [r, g, b] => [r, g, b, 255],
                [r, g, b, a] => [r, g, b, a],
                _ => unreachable!(),
            };
            dst.copy_from_slice(&rgba);
        }
    }

    Ok(bitmap.into())
}

/// Write a PNG image
///
/// # Errors
///
/// Returns [`IoError::EncodeError`] for a bitmap with no pixels, or if the
/// encoder fails.
pub fn write_png<W: Write>(bitmap: &Bitmap, writer: W) -> IoResult<()> {
    if bitmap.is_empty() {
        return Err(IoError::EncodeError(format!(
            "cannot encode a {}x{} bitmap",
            bitmap.width(),
            bitmap.height()
        )));
    }

    let mut encoder = Encoder::new(writer, bitmap.width(), bitmap.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(bitmap.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

/// Encode a bitmap as PNG bytes
pub fn encode_png(bitmap: &Bitmap) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_png(bitmap, &mut buffer)?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notdotblur_core::Pixel;
    use std::io::Cursor;

    fn encode_raw(width: u32, height: u32, color: ColorType, depth: BitDepth, data: &[u8]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buffer
    }

    #[test]
    fn test_png_roundtrip_rgba() {
        let pixels = [
            Pixel::new(255, 0, 0, 255),
            Pixel::new(0, 255, 0, 128),
            Pixel::new(0, 0, 255, 0),
            Pixel::new(12, 34, 56, 78),
            Pixel::new(1, 1, 1, 1),
            Pixel::new(254, 253, 252, 251),
        ];
        let bitmap = Bitmap::from_pixels(3, 2, &pixels).unwrap();

        let bytes = encode_png(&bitmap).unwrap();
        let decoded = read_png(Cursor::new(bytes)).unwrap();

        assert_eq!(decoded, bitmap);
        assert_eq!(decoded.informat(), ImageFormat::Png);
    }

    #[test]
    fn test_png_read_grayscale() {
        let data = [0u8, 100, 200, 255];
        let bytes = encode_raw(2, 2, ColorType::Grayscale, BitDepth::Eight, &data);
        let bitmap = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some(Pixel::gray(0)));
        assert_eq!(bitmap.pixel(1, 0), Some(Pixel::gray(100)));
        assert_eq!(bitmap.pixel(0, 1), Some(Pixel::gray(200)));
        assert_eq!(bitmap.pixel(1, 1), Some(Pixel::gray(255)));
    }

    #[test]
    fn test_png_read_gray_alpha() {
        let data = [10u8, 20, 30, 40];
        let bytes = encode_raw(2, 1, ColorType::GrayscaleAlpha, BitDepth::Eight, &data);
        let bitmap = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some(Pixel::new(10, 10, 10, 20)));
        assert_eq!(bitmap.pixel(1, 0), Some(Pixel::new(30, 30, 30, 40)));
    }

    #[test]
    fn test_png_read_rgb16_strips_to_8() {
        // big-endian 16-bit samples, high byte kept
        let data = [0xAB, 0xCD, 0x12, 0x34, 0xFF, 0xFF];
        let bytes = encode_raw(1, 1, ColorType::Rgb, BitDepth::Sixteen, &data);
        let bitmap = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some(Pixel::rgb(0xAB, 0x12, 0xFF)));
    }

    #[test]
    fn test_png_read_indexed() {
        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, 3, 1);
            encoder.set_color(ColorType::Indexed);
            encoder.set_depth(BitDepth::Eight);
            encoder.set_palette(vec![255, 0, 0, 0, 255, 0, 0, 0, 255]);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[2, 1, 0]).unwrap();
        }
        let bitmap = read_png(Cursor::new(buffer)).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some(Pixel::rgb(0, 0, 255)));
        assert_eq!(bitmap.pixel(1, 0), Some(Pixel::rgb(0, 255, 0)));
        assert_eq!(bitmap.pixel(2, 0), Some(Pixel::rgb(255, 0, 0)));
    }

    #[test]
    fn test_png_read_truncated() {
        let bitmap = Bitmap::from_pixels(2, 2, &[Pixel::gray(9); 4]).unwrap();
        let bytes = encode_png(&bitmap).unwrap();
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(
            read_png(Cursor::new(truncated)),
            Err(IoError::DecodeError(_))
        ));
    }

    #[test]
    fn test_png_write_empty() {
        let empty = Bitmap::from_raw(0, 0, Vec::new()).unwrap();
        assert!(matches!(encode_png(&empty), Err(IoError::EncodeError(_))));
    }
}
