//! notdotblur-test - Regression test harness for NotDotBlur
//!
//! Each `*_reg.rs` test drives a [`RegParams`], which numbers every check,
//! records failures instead of panicking on the first one, and reports a
//! summary from [`RegParams::cleanup`]. Three modes are supported:
//!
//! - **Generate**: write outputs and store them as golden files
//! - **Compare**: check outputs against golden files when present (default)
//! - **Display**: write outputs for visual inspection only
//!
//! # Usage
//!
//! ```ignore
//! use notdotblur_test::RegParams;
//!
//! let mut rp = RegParams::new("scale");
//! rp.compare_values(8.0, out.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use notdotblur_core::{Bitmap, Pixel};

/// A `width` x `height` bitmap whose red channel ramps along x, green along
/// y, and blue and alpha vary with both.
pub fn gradient_bitmap(width: u32, height: u32) -> TestResult<Bitmap> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    let x_span = width.saturating_sub(1).max(1);
    let y_span = height.saturating_sub(1).max(1);
    for y in 0..height {
        for x in 0..width {
            pixels.push(Pixel::new(
                (x * 255 / x_span) as u8,
                (y * 255 / y_span) as u8,
                ((x + y) % 256) as u8,
                255 - ((x * 7 + y * 3) % 128) as u8,
            ));
        }
    }
    Ok(Bitmap::from_pixels(width, height, &pixels)?)
}

/// A deterministic pseudo-random bitmap. The same `seed` always yields the
/// same pixels.
pub fn noise_bitmap(width: u32, height: u32, seed: u64) -> TestResult<Bitmap> {
    let mut state = seed;
    let mut data = vec![0u8; width as usize * height as usize * 4];
    for byte in &mut data {
        // Knuth's MMIX LCG
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *byte = (state >> 56) as u8;
    }
    Ok(Bitmap::from_raw(width, height, data)?)
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // notdotblur-test is at crates/notdotblur-test
    format!("{}/../..", manifest_dir)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
