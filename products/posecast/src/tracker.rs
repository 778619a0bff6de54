use {
    crate::{Config, DepthProjector, KeypointSelector, PipelineError, PoseResult, RigidTransform},
    base::{Vec2, Vec3},
    video::VideoFrame,
};

/// Maps the best pose of a frame to world-space joint positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracker {
    selector: KeypointSelector,
    projector: DepthProjector,
    transform: RigidTransform,
}

impl Tracker {
    pub fn new(selector: KeypointSelector, projector: DepthProjector, transform: RigidTransform) -> Self {
        Self {
            selector,
            projector,
            transform,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            KeypointSelector::new(config.joints.clone()),
            DepthProjector::new(config.camera_size()),
            RigidTransform::from_config(&config.transform),
        )
    }

    pub fn selector(&self) -> &KeypointSelector {
        &self.selector
    }

    /// Image-space positions of the selected joints of the best pose.
    pub fn pixels(&self, result: &PoseResult) -> Result<Option<Vec<Vec2<f32>>>, PipelineError> {
        match result.best() {
            Some(person) => Ok(Some(self.selector.select(&person.keypoints)?)),
            None => Ok(None),
        }
    }

    /// World-space positions, `None` when the frame has no person.
    pub fn locate(
        &self,
        result: &PoseResult,
        frame: &VideoFrame,
    ) -> Result<Option<Vec<Vec3<f32>>>, PipelineError> {
        let Some(pixels) = self.pixels(result)? else {
            return Ok(None);
        };
        let depth = frame.depth.as_ref().ok_or(PipelineError::MissingDepth)?;
        let camera_points = pixels
            .into_iter()
            .map(|p| self.projector.project(p, depth, &frame.intrinsics))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(self.transform.apply_all(&camera_points)))
    }
}

/// Flatten points to `[x0, y0, z0, x1, ...]`.
pub fn flatten(points: &[Vec3<f32>]) -> Vec<f32> {
    points.iter().flat_map(|p| p.to_array()).collect()
}
