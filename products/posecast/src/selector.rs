use {
    crate::{PersonResult, PipelineError},
    base::Vec2,
};

/// Picks a fixed, ordered subset of joints from a pose.
#[derive(Debug, Clone, PartialEq)]
pub struct KeypointSelector {
    joints: Vec<usize>,
}

impl KeypointSelector {
    pub fn new(joints: Vec<usize>) -> Self {
        Self { joints }
    }

    pub fn joints(&self) -> &[usize] {
        &self.joints
    }

    pub fn select(&self, keypoints: &[[f32; 2]]) -> Result<Vec<Vec2<f32>>, PipelineError> {
        self.joints
            .iter()
            .map(|&index| {
                keypoints
                    .get(index)
                    .map(|&[x, y]| Vec2::new(x, y))
                    .ok_or(PipelineError::MissingJoint {
                        index,
                        available: keypoints.len(),
                    })
            })
            .collect()
    }

    /// Selected joints whose score reaches their visibility threshold.
    pub fn select_visible(&self, person: &PersonResult, thresholds: &[f32]) -> Vec<Vec2<f32>> {
        self.joints
            .iter()
            .filter_map(|&index| {
                let [x, y] = *person.keypoints.get(index)?;
                let score = *person.keypoint_scores.get(index)?;
                let threshold = thresholds.get(index).copied().unwrap_or(0.0);
                (score >= threshold).then(|| Vec2::new(x, y))
            })
            .collect()
    }
}
