use {inference::InferError, std::fmt};

/// Per-frame processing stage, for error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Detecting,
    PoseEstimating,
    Decoding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Detecting => write!(f, "detecting"),
            Stage::PoseEstimating => write!(f, "pose estimating"),
            Stage::Decoding => write!(f, "decoding"),
        }
    }
}

/// Failure of one frame. The stream loop logs it and moves to the next frame.
#[derive(Debug)]
pub enum PipelineError {
    Infer { stage: Stage, source: InferError },
    MissingDepth,
    DepthOutOfRange { x: usize, y: usize },
    MissingJoint { index: usize, available: usize },
}

impl PipelineError {
    pub(crate) fn at(stage: Stage) -> impl FnOnce(InferError) -> Self {
        move |source| PipelineError::Infer { stage, source }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Infer { stage, source } => write!(f, "{} failed: {}", stage, source),
            PipelineError::MissingDepth => write!(f, "frame has no depth image"),
            PipelineError::DepthOutOfRange { x, y } => {
                write!(f, "depth lookup at ({}, {}) is outside the depth image", x, y)
            }
            PipelineError::MissingJoint { index, available } => {
                write!(f, "joint {} requested, pose has {} joints", index, available)
            }
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Infer { source, .. } => Some(source),
            _ => None,
        }
    }
}
