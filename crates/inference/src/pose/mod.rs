//! Top-down pose estimation stages: crop each detection, run the pose
//! model (optionally with a mirrored pass), decode heatmaps into image
//! coordinates and merge duplicate poses.

mod crop;
pub use crop::*;

mod estimator;
pub use estimator::*;

mod flip;
pub use flip::*;

mod heatmap;
pub use heatmap::*;

mod nms;
pub use nms::*;

mod preset;
pub use preset::*;

mod types;
pub use types::*;
