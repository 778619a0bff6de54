//! Image containers and still-image decoding.
//!
//! Pixels are stored interleaved, row-major, top-left origin.

mod decode;
pub use decode::*;

mod error;
pub use error::*;

mod image;
pub use image::*;

mod pixelformat;
pub use pixelformat::*;

mod u32;
pub use u32::*;
