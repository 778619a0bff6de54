//! Color+depth frame capture.
//!
//! `VideoIn` runs a capture device on its own worker thread and hands
//! frames to async code. Each frame carries the color image, the depth
//! image aligned to it (if the device has one), and the color intrinsics
//! needed to deproject pixels.

mod error;
pub use error::*;

mod intrinsics;
pub use intrinsics::*;

mod videoframe;
pub use videoframe::*;

pub mod videoin;
pub use videoin::{VideoIn, VideoInConfig};
