use {
    crate::{Pipeline, PipelineError, PoseResult, Tracker, flatten},
    video::VideoFrame,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub result: PoseResult,
    /// world-space joints flattened, `None` when no person was found
    pub points: Option<Vec<f32>>,
}

/// Runs one frame from color image to published joint array.
pub struct FrameProcessor {
    pipeline: Pipeline,
    tracker: Tracker,
}

impl FrameProcessor {
    pub fn new(pipeline: Pipeline, tracker: Tracker) -> Self {
        Self { pipeline, tracker }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn process(&mut self, name: &str, frame: &VideoFrame) -> Result<FrameOutput, PipelineError> {
        let result = self.pipeline.process(name, &frame.color)?;
        let points = self
            .tracker
            .locate(&result, frame)?
            .map(|points| flatten(&points));
        Ok(FrameOutput { result, points })
    }
}
