use std::fmt;

#[derive(Debug)]
pub enum InferError {
    Session(String),
    Shape(String),
    Io(String),
    Runtime(String),
    UnsupportedJoints(usize),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Session(msg) => write!(f, "onnx session error: {msg}"),
            InferError::Shape(msg) => write!(f, "shape error: {msg}"),
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::Runtime(msg) => write!(f, "runtime error: {msg}"),
            InferError::UnsupportedJoints(count) => {
                write!(f, "unsupported joint count: {count}")
            }
        }
    }
}

impl std::error::Error for InferError {}

impl From<ort::Error> for InferError {
    fn from(err: ort::Error) -> Self {
        InferError::Session(err.to_string())
    }
}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<base::TensorError> for InferError {
    fn from(err: base::TensorError) -> Self {
        InferError::Shape(err.to_string())
    }
}

impl From<ndarray::ShapeError> for InferError {
    fn from(err: ndarray::ShapeError) -> Self {
        InferError::Shape(err.to_string())
    }
}

impl From<image::ImageError> for InferError {
    fn from(err: image::ImageError) -> Self {
        InferError::Shape(err.to_string())
    }
}
