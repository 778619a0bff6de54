//! Person detection and top-down pose estimation.
//!
//! Models run through ONNX Runtime. Everything around the models
//! (letterboxing, box NMS, affine crops, heatmap decoding, flip test
//! and pose NMS) is plain Rust over `base::Tensor`.

pub mod detector;
pub mod error;
pub mod inference;
pub mod onnx;
pub mod pose;

pub use {
    detector::{Detection, PERSON_CLASS, PersonDetector, YoloDetector},
    error::InferError,
    inference::{Device, Inference},
    pose::*,
};
