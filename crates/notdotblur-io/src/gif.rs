//! GIF image format support
//!
//! Reads the first frame of a GIF image. Animated GIFs are accepted; later
//! frames are ignored, matching what a still-image viewer shows.

use crate::{IoError, IoResult};
use gif::{ColorOutput, DecodeOptions};
use notdotblur_core::{BYTES_PER_PIXEL, Bitmap, BitmapMut, ImageFormat};
use std::io::Read;

/// Read a GIF image
///
/// The first frame is composited at its offset onto a transparent canvas
/// the size of the GIF's logical screen.
pub fn read_gif<R: Read>(reader: R) -> IoResult<Bitmap> {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::RGBA);

    let mut decoder = options
        .read_info(reader)
        .map_err(|e| IoError::DecodeError(format!("GIF decode error: {}", e)))?;

    let canvas_width = u32::from(decoder.width());
    let canvas_height = u32::from(decoder.height());

    let frame = decoder
        .read_next_frame()
        .map_err(|e| IoError::DecodeError(format!("GIF frame error: {}", e)))?
        .ok_or_else(|| IoError::InvalidData("no frames in GIF".to_string()))?;

    let mut bitmap = BitmapMut::new(canvas_width, canvas_height)?;
    bitmap.set_informat(ImageFormat::Gif);

    let frame_width = usize::from(frame.width);
    let left = usize::from(frame.left);
    let top = u32::from(frame.top);
    let frame_stride = frame_width * BYTES_PER_PIXEL;

    if frame.buffer.len() < frame_stride * usize::from(frame.height) {
        return Err(IoError::InvalidData(format!(
            "GIF frame buffer too short: {} bytes for {}x{}",
            frame.buffer.len(),
            frame.width,
            frame.height
        )));
    }

    // Clip the frame to the canvas
    let visible = frame_width.min((canvas_width as usize).saturating_sub(left));
    if visible > 0 {
        let dst_start = left * BYTES_PER_PIXEL;
        let dst_end = dst_start + visible * BYTES_PER_PIXEL;
        for (fy, src_row) in frame
            .buffer
            .chunks_exact(frame_stride)
            .take(usize::from(frame.height))
            .enumerate()
        {
            let Some(dst_row) = bitmap.row_mut(top + fy as u32) else {
                break;
            };
            dst_row[dst_start..dst_end]
                .copy_from_slice(&src_row[..visible * BYTES_PER_PIXEL]);
        }
    }

    Ok(bitmap.into())
}
