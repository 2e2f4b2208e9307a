//! notdotblur-io - Image I/O for NotDotBlur
//!
//! Decodes PNG, JPEG, GIF and BMP files into RGBA [`Bitmap`]s and encodes
//! bitmaps as PNG, the only output format.
//!
//! Each format lives behind a cargo feature (`png-format`, `jpeg`,
//! `gif-format`, `bmp`); all four are enabled by default.

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
pub mod format;
#[cfg(feature = "gif-format")]
pub mod gif;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;

pub use error::{IoError, IoResult};
pub use format::{detect_format_from_bytes, format_from_path};
pub use notdotblur_core::ImageFormat;

use notdotblur_core::Bitmap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read the raw bytes of a file.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the file cannot be read and
/// [`IoError::EmptyInput`] if it is empty.
pub fn read_file<P: AsRef<Path>>(path: P) -> IoResult<Vec<u8>> {
    let path = path.as_ref();
    let data = fs::read(path)?;
    if data.is_empty() {
        return Err(IoError::EmptyInput);
    }
    debug!(path = %path.display(), bytes = data.len(), "read input file");
    Ok(data)
}

/// Decode `data` as `format`.
///
/// # Errors
///
/// - [`IoError::EmptyInput`] if `data` is empty
/// - [`IoError::UnsupportedFormat`] if the format is unknown or its feature
///   is disabled
/// - [`IoError::DecodeError`] / [`IoError::InvalidData`] for malformed data
pub fn decode(data: &[u8], format: ImageFormat) -> IoResult<Bitmap> {
    if data.is_empty() {
        return Err(IoError::EmptyInput);
    }

    let bitmap = match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(std::io::Cursor::new(data))?,
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(data)?,
        #[cfg(feature = "gif-format")]
        ImageFormat::Gif => gif::read_gif(data)?,
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::read_bmp(data)?,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} support not enabled",
                other
            )));
        }
    };

    debug!(
        ?format,
        width = bitmap.width(),
        height = bitmap.height(),
        "decoded image"
    );
    Ok(bitmap)
}

/// Read and decode an image, choosing the decoder by file extension.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Bitmap> {
    let path = path.as_ref();
    let format = format_from_path(path)?;
    let data = read_file(path)?;
    decode(&data, format)
}

/// Read and decode an image, choosing the decoder by file extension, or by
/// magic number when the path has no extension at all.
///
/// # Errors
///
/// An extension outside `png`, `jpg`, `jpeg`, `gif`, `bmp` is rejected with
/// [`IoError::UnsupportedFormat`] before the file is read.
pub fn read_image_auto<P: AsRef<Path>>(path: P) -> IoResult<Bitmap> {
    let path = path.as_ref();
    if path.extension().is_some() {
        return read_image(path);
    }
    let data = read_file(path)?;
    let format = detect_format_from_bytes(&data)?;
    decode(&data, format)
}

/// Encode a bitmap as PNG bytes.
#[cfg(feature = "png-format")]
pub fn encode(bitmap: &Bitmap) -> IoResult<Vec<u8>> {
    png::encode_png(bitmap)
}

/// Encode a bitmap as PNG and write it to `path`.
///
/// The PNG is written to a hidden sibling file and renamed over `path`, so
/// `path` either keeps its old contents or holds the complete new image.
#[cfg(feature = "png-format")]
pub fn write_image<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> IoResult<()> {
    let path = path.as_ref();
    let bytes = png::encode_png(bitmap)?;

    let tmp = temp_sibling(path);
    let written = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    debug!(path = %path.display(), bytes = bytes.len(), "wrote PNG");
    Ok(())
}

/// `dir/.name.tmp` for `dir/name`
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Default file name for an enlarged image:
/// `{stem}-x{factor}-{width}x{height}.png`.
///
/// `width` and `height` are the enlarged dimensions.
pub fn default_output_name<P: AsRef<Path>>(
    input: P,
    factor: u32,
    width: u32,
    height: u32,
) -> String {
    let stem = input
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    format!("{}-x{}-{}x{}.png", stem, factor, width, height)
}

/// [`default_output_name`] placed next to the input file.
pub fn default_output_path<P: AsRef<Path>>(
    input: P,
    factor: u32,
    width: u32,
    height: u32,
) -> PathBuf {
    let input = input.as_ref();
    let name = default_output_name(input, factor, width, height);
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}
