//! Streams the 3D positions of selected body joints.
//!
//! A frame goes through person detection, pose estimation and pose merging
//! (`Pipeline`), then the chosen joints of the best pose are deprojected with
//! the frame's depth and mapped into the world frame (`Tracker`). The
//! resulting flat float array is handed to a `ResultSink`.

mod config;
pub use config::*;

mod error;
pub use error::*;

mod geometry;
pub use geometry::*;

mod pipeline;
pub use pipeline::*;

mod processor;
pub use processor::*;

mod profiler;
pub use profiler::*;

mod result;
pub use result::*;

mod selector;
pub use selector::*;

mod sink;
pub use sink::*;

mod tracker;
pub use tracker::*;

#[cfg(feature = "preview")]
mod preview;
#[cfg(feature = "preview")]
pub use preview::*;
