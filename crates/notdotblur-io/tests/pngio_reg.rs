//! PNG I/O regression test
//!
//! Writes synthetic bitmaps through the file API and reads them back.

use notdotblur_core::{Bitmap, ImageFormat, Pixel};
use notdotblur_io::{IoError, encode, read_image, read_image_auto, write_image};
use notdotblur_test::{RegParams, gradient_bitmap, noise_bitmap, regout_dir};

fn out_path(name: &str) -> String {
    format!("{}/{}", regout_dir(), name)
}

#[test]
fn pngio_reg() {
    let mut rp = RegParams::new("pngio");

    // --- Test 1: file round trip keeps every pixel, alpha included ---
    for (i, bitmap) in [
        gradient_bitmap(17, 9).expect("gradient"),
        noise_bitmap(8, 8, 99).expect("noise"),
        Bitmap::from_pixels(1, 1, &[Pixel::new(1, 2, 3, 0)]).expect("single"),
    ]
    .iter()
    .enumerate()
    {
        let path = out_path(&format!("pngio.roundtrip{}.png", i));
        write_image(bitmap, &path).expect("write");
        let back = read_image(&path).expect("read");
        rp.compare_bitmaps(bitmap, &back);
        rp.compare_values(
            1.0,
            (back.informat() == ImageFormat::Png) as u8 as f64,
            0.0,
        );
    }

    // --- Test 2: file contents equal the in-memory encoding ---
    let bitmap = gradient_bitmap(6, 4).expect("gradient");
    let path = out_path("pngio.bytes.png");
    write_image(&bitmap, &path).expect("write");
    let on_disk = std::fs::read(&path).expect("read bytes");
    let in_memory = encode(&bitmap).expect("encode");
    rp.compare_strings(&in_memory, &on_disk);

    // --- Test 3: extensionless file is sniffed ---
    let path = out_path("pngio-noext");
    std::fs::write(&path, &in_memory).expect("write noext");
    let sniffed = read_image_auto(&path).expect("auto");
    rp.compare_bitmaps(&bitmap, &sniffed);
    let by_ext = matches!(read_image(&path), Err(IoError::UnsupportedFormat(_)));
    rp.compare_values(1.0, by_ext as u8 as f64, 0.0);

    // --- Test 4: an unrecognised extension is rejected, not sniffed ---
    let path = out_path("pngio.tiff");
    std::fs::write(&path, &in_memory).expect("write tiff");
    let rejected = match read_image_auto(&path) {
        Err(IoError::UnsupportedFormat(msg)) => msg.contains("(.tiff)"),
        _ => false,
    };
    rp.compare_values(1.0, rejected as u8 as f64, 0.0);

    assert!(rp.cleanup(), "pngio regression test failed");
}

#[test]
fn pngio_errors_reg() {
    let mut rp = RegParams::new("pngio_errors");

    // --- Missing file ---
    let missing = matches!(
        read_image(out_path("pngio.does-not-exist.png")),
        Err(IoError::Io(_))
    );
    rp.compare_values(1.0, missing as u8 as f64, 0.0);

    // --- Empty file ---
    let path = out_path("pngio.empty.png");
    std::fs::write(&path, b"").expect("write empty");
    let empty = matches!(read_image(&path), Err(IoError::EmptyInput));
    rp.compare_values(1.0, empty as u8 as f64, 0.0);

    // --- Corrupt file with a PNG name ---
    let path = out_path("pngio.corrupt.png");
    std::fs::write(&path, b"definitely not a png").expect("write corrupt");
    let corrupt = matches!(read_image(&path), Err(IoError::DecodeError(_)));
    rp.compare_values(1.0, corrupt as u8 as f64, 0.0);

    // --- Unwritable destination ---
    let bitmap = gradient_bitmap(2, 2).expect("gradient");
    let unwritable = matches!(
        write_image(&bitmap, out_path("no-such-dir/out.png")),
        Err(IoError::Io(_))
    );
    rp.compare_values(1.0, unwritable as u8 as f64, 0.0);

    // --- Failed write leaves neither output nor temporary file behind ---
    let dir_target = out_path("pngio.dir-target.png");
    std::fs::create_dir_all(&dir_target).expect("create dir target");
    let failed = matches!(write_image(&bitmap, &dir_target), Err(IoError::Io(_)));
    rp.compare_values(1.0, failed as u8 as f64, 0.0);
    rp.compare_values(1.0, std::path::Path::new(&dir_target).is_dir() as u8 as f64, 0.0);
    let leftover = std::path::Path::new(&out_path(".pngio.dir-target.png.tmp")).exists();
    rp.compare_values(0.0, leftover as u8 as f64, 0.0);

    // --- Overwriting replaces the whole file ---
    let path = out_path("pngio.overwrite.png");
    write_image(&gradient_bitmap(40, 40).expect("large"), &path).expect("write large");
    write_image(&bitmap, &path).expect("write small");
    let back = read_image(&path).expect("read overwritten");
    rp.compare_bitmaps(&bitmap, &back);
    let on_disk = std::fs::read(&path).expect("read bytes");
    rp.compare_strings(&encode(&bitmap).expect("encode"), &on_disk);

    assert!(rp.cleanup(), "pngio_errors regression test failed");
}
