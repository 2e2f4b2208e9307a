//! NotDotBlur - Enlarge pixel art without blurring
//!
//! Every source pixel becomes an `f` x `f` block of the same colour, so hard
//! pixel edges survive enlargement. Inputs may be PNG, JPEG, GIF or BMP;
//! output is always PNG.
//!
//! # Example
//!
//! ```
//! use notdotblur::{Bitmap, Pixel};
//! use notdotblur::transform::{ScaleFactor, scale};
//!
//! let src = Bitmap::from_pixels(2, 1, &[Pixel::rgb(255, 0, 0), Pixel::rgb(0, 0, 255)]).unwrap();
//! let out = scale(&src, ScaleFactor::new(2).unwrap()).unwrap();
//! assert_eq!(out.dimensions(), (4, 2));
//! ```

pub mod pipeline;

// Re-export core types (primary data structures used everywhere)
pub use notdotblur_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use notdotblur_io as io;
pub use notdotblur_transform as transform;

pub use pipeline::{EnlargeOptions, Enlarged, PipelineError, enlarge_file};
