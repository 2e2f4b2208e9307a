//! BMP image format support
//!
//! Reads uncompressed Windows Bitmap (BMP) files: 1, 4 and 8 bpp with a
//! palette, 24 bpp, and 32 bpp. BMP is input-only.

use crate::{IoError, IoResult};
use notdotblur_core::{BYTES_PER_PIXEL, Bitmap, BitmapMut, ImageFormat};
use std::io::Read;

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

/// Uncompressed pixels
const BI_RGB: u32 = 0;

/// Uncompressed pixels with channel masks
const BI_BITFIELDS: u32 = 3;

fn le_u16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn le_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn le_i32(b: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

/// One channel of a BI_BITFIELDS pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ChannelMask {
    mask: u32,
    shift: u32,
    bits: u32,
}

impl ChannelMask {
    fn new(mask: u32) -> Self {
        let shift = if mask == 0 { 0 } else { mask.trailing_zeros() };
        ChannelMask {
            mask,
            shift,
            bits: (mask >> shift).count_ones(),
        }
    }

    /// Extract the channel as 8 bits, or `missing` if the mask is empty.
    fn extract(self, value: u32, missing: u8) -> u8 {
        if self.mask == 0 {
            return missing;
        }
        let v = (value & self.mask) >> self.shift;
        if self.bits >= 8 {
            (v >> (self.bits - 8)) as u8
        } else {
            (v * 255 / ((1 << self.bits) - 1)) as u8
        }
    }
}

/// Channel masks for 32 bpp pixels, read as little-endian `u32`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelMasks {
    r: ChannelMask,
    g: ChannelMask,
    b: ChannelMask,
    a: ChannelMask,
}

impl PixelMasks {
    /// BI_RGB layout: BGRx with the fourth byte unused.
    const BGRX: PixelMasks = PixelMasks {
        r: ChannelMask { mask: 0x00FF_0000, shift: 16, bits: 8 },
        g: ChannelMask { mask: 0x0000_FF00, shift: 8, bits: 8 },
        b: ChannelMask { mask: 0x0000_00FF, shift: 0, bits: 8 },
        a: ChannelMask { mask: 0, shift: 0, bits: 0 },
    };

    fn new(r: u32, g: u32, b: u32, a: u32) -> Self {
        PixelMasks {
            r: ChannelMask::new(r),
            g: ChannelMask::new(g),
            b: ChannelMask::new(b),
            a: ChannelMask::new(a),
        }
    }

    fn rgba(&self, value: u32) -> [u8; 4] {
        [
            self.r.extract(value, 0),
            self.g.extract(value, 0),
            self.b.extract(value, 0),
            self.a.extract(value, 255),
        ]
    }
}

fn skip<R: Read>(reader: &mut R, count: usize) -> IoResult<()> {
    let copied = std::io::copy(&mut reader.by_ref().take(count as u64), &mut std::io::sink())?;
    if copied < count as u64 {
        return Err(IoError::InvalidData("BMP file truncated".to_string()));
    }
    Ok(())
}

/// Read a BMP image
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Bitmap> {
    // Read file header (14 bytes)
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
    reader.read_exact(&mut file_header)?;

    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }

    let pixel_offset = le_u32(&file_header, 10) as usize;

    // Read info header (minimum 40 bytes)
    let mut info_header = [0u8; BMP_INFO_HEADER_SIZE as usize];
    reader.read_exact(&mut info_header)?;

    let header_size = le_u32(&info_header, 0);
    if header_size < BMP_INFO_HEADER_SIZE {
        return Err(IoError::InvalidData(format!(
            "unsupported BMP header size: {}",
            header_size
        )));
    }

    let width = le_i32(&info_header, 4);
    let height = le_i32(&info_header, 8);

    let planes = le_u16(&info_header, 12);
    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {}",
            planes
        )));
    }

    let bits_per_pixel = le_u16(&info_header, 14);
    let compression = le_u32(&info_header, 16);
    let colors_used = le_u32(&info_header, 32) as usize;

    if compression != BI_RGB && !(compression == BI_BITFIELDS && bits_per_pixel == 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {}",
            compression
        )));
    }

    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {}",
            bits_per_pixel
        )));
    }

    if width <= 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "invalid BMP dimensions: {}x{}",
            width, height
        )));
    }

    let width = width.unsigned_abs();
    let top_down = height < 0;
    let height = height.unsigned_abs();

    // V2+ headers carry the masks at offsets 40..56 of the info header;
    // anything past that is skipped
    let mut consumed = BMP_FILE_HEADER_SIZE + BMP_INFO_HEADER_SIZE as usize;
    let extra_header = header_size as usize - BMP_INFO_HEADER_SIZE as usize;
    let mut header_masks = vec![0u8; extra_header.min(16)];
    reader.read_exact(&mut header_masks)?;
    skip(&mut reader, extra_header - header_masks.len())?;
    consumed += extra_header;

    let masks = if compression == BI_BITFIELDS {
        if header_masks.len() < 12 {
            // BITMAPINFOHEADER: R, G, B masks follow the header, no alpha
            let mut raw = [0u8; 12];
            reader.read_exact(&mut raw)?;
            consumed += raw.len();
            PixelMasks::new(le_u32(&raw, 0), le_u32(&raw, 4), le_u32(&raw, 8), 0)
        } else {
            let alpha = if header_masks.len() >= 16 {
                le_u32(&header_masks, 12)
            } else {
                0
            };
            PixelMasks::new(
                le_u32(&header_masks, 0),
                le_u32(&header_masks, 4),
                le_u32(&header_masks, 8),
                alpha,
            )
        }
    } else {
        PixelMasks::BGRX
    };

    // Palette for 1, 4, 8 bpp: BGRx quads
    let palette: Vec<[u8; 4]> = if bits_per_pixel <= 8 {
        let max_colors = 1usize << bits_per_pixel;
        let num_colors = if colors_used == 0 {
            max_colors
        } else {
            colors_used.min(max_colors)
        };
        let mut raw = vec![0u8; num_colors * 4];
        reader.read_exact(&mut raw)?;
        consumed += raw.len();
        raw.chunks_exact(4)
            .map(|q| [q[2], q[1], q[0], 255])
            .collect()
    } else {
        Vec::new()
    };

    // Skip to pixel data
    if pixel_offset > consumed {
        skip(&mut reader, pixel_offset - consumed)?;
    }

    let mut bitmap = BitmapMut::new(width, height)?;
    bitmap.set_informat(ImageFormat::Bmp);

    let lookup = |index: u8| -> IoResult<[u8; 4]> {
        palette.get(index as usize).copied().ok_or_else(|| {
            IoError::InvalidData(format!("BMP palette index {} out of range", index))
        })
    };

    // Calculate row stride (BMP rows are 4-byte aligned)
    let row_stride = (width as usize * bits_per_pixel as usize).div_ceil(32) * 4;
    let mut row_buffer = vec![0u8; row_stride];

    for row in 0..height {
        reader.read_exact(&mut row_buffer).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => {
                IoError::InvalidData("BMP pixel data truncated".to_string())
            }
            _ => IoError::Io(e),
        })?;

        let y = if top_down { row } else { height - 1 - row };
        let dst_row = bitmap
            .row_mut(y)
            .ok_or_else(|| IoError::InvalidData(format!("BMP row {} out of range", y)))?;

        for (x, dst) in dst_row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let rgba = match bits_per_pixel {
                1 => lookup((row_buffer[x / 8] >> (7 - (x % 8))) & 1)?,
                4 => {
                    let byte = row_buffer[x / 2];
                    lookup(if x % 2 == 0 { byte >> 4 } else { byte & 0xF })?
                }
                8 => lookup(row_buffer[x])?,
                24 => {
                    let idx = x * 3;
                    [row_buffer[idx + 2], row_buffer[idx + 1], row_buffer[idx], 255]
                }
                32 => masks.rgba(le_u32(&row_buffer, x * 4)),
                _ => unreachable!(),
            };
            dst.copy_from_slice(&rgba);
        }
    }

    Ok(bitmap.into())
}
