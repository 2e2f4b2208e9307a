//! Image format detection
//!
//! Formats are chosen by file extension, the way the user picked the file.
//! Magic-number sniffing is the fallback when a path has no usable
//! extension.

use crate::{IoError, IoResult};
use notdotblur_core::ImageFormat;
use std::path::Path;

/// Magic numbers for image format detection
mod magic {
    /// BMP: "BM"
    pub const BMP: &[u8] = b"BM";

    /// PNG: 89 50 4E 47 0D 0A 1A 0A
    pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// JPEG: FF D8 FF
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    /// GIF87a
    pub const GIF87A: &[u8] = b"GIF87a";

    /// GIF89a
    pub const GIF89A: &[u8] = b"GIF89a";
}

/// Pick the format from the extension of `path`.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] if the extension is missing or is
/// not one of `png`, `jpg`, `jpeg`, `gif`, `bmp` (any case).
pub fn format_from_path<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    ImageFormat::from_extension(ext)
        .ok_or_else(|| IoError::UnsupportedFormat(format!("unsupported file extension (.{})", ext)))
}

/// Detect image format from leading bytes
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(
            "not enough data to detect format".to_string(),
        ));
    }

    if data.starts_with(magic::PNG) {
        return Ok(ImageFormat::Png);
    }

    if data.starts_with(magic::JPEG) {
        return Ok(ImageFormat::Jpeg);
    }

    if data.starts_with(magic::GIF87A) || data.starts_with(magic::GIF89A) {
        return Ok(ImageFormat::Gif);
    }

    if data.starts_with(magic::BMP) {
        return Ok(ImageFormat::Bmp);
    }

    Err(IoError::UnsupportedFormat(
        "unknown image format".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(format_from_path("a/b/cat.PNG").unwrap(), ImageFormat::Png);
        assert_eq!(format_from_path("photo.JPEG").unwrap(), ImageFormat::Jpeg);
        assert_eq!(format_from_path("photo.jpg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(format_from_path("anim.gif").unwrap(), ImageFormat::Gif);
        assert_eq!(format_from_path("old.Bmp").unwrap(), ImageFormat::Bmp);
    }

    #[test]
    fn test_format_from_path_unsupported() {
        assert!(matches!(
            format_from_path("scan.tiff"),
            Err(IoError::UnsupportedFormat(msg)) if msg.contains(".tiff")
        ));
        assert!(format_from_path("noext").is_err());
    }

    #[test]
    fn test_detect_bmp() {
        let data = b"BM\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";
        assert_eq!(detect_format_from_bytes(data).unwrap(), ImageFormat::Bmp);
    }

    #[test]
    fn test_detect_png() {
        let data = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_jpeg() {
        let data = [
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01,
        ];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_gif() {
        assert_eq!(
            detect_format_from_bytes(b"GIF89a\x00\x00").unwrap(),
            ImageFormat::Gif
        );
        assert_eq!(
            detect_format_from_bytes(b"GIF87a\x00\x00").unwrap(),
            ImageFormat::Gif
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            detect_format_from_bytes(b"P6\n1 1\n255\n"),
            Err(IoError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format_from_bytes(b"B"),
            Err(IoError::InvalidData(_))
        ));
    }
}
