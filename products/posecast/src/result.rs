use {inference::FilteredPose, serde::Serialize};

/// One person in a `PoseResult`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonResult {
    pub keypoints: Vec<[f32; 2]>,
    pub keypoint_scores: Vec<f32>,
    pub proposal_score: f32,
    pub track_id: usize,
    /// `[x, y, w, h]`
    pub bbox: [f32; 4],
}

impl From<&FilteredPose> for PersonResult {
    fn from(pose: &FilteredPose) -> Self {
        Self {
            keypoints: pose.keypoints.iter().map(|p| [p.x, p.y]).collect(),
            keypoint_scores: pose.scores.clone(),
            proposal_score: pose.proposal_score,
            track_id: pose.track_id,
            bbox: [
                pose.bbox.origin.x,
                pose.bbox.origin.y,
                pose.bbox.size.x,
                pose.bbox.size.y,
            ],
        }
    }
}

/// Poses found in one image, best first. No person is an empty `result`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseResult {
    pub image_name: String,
    pub result: Vec<PersonResult>,
}

impl PoseResult {
    pub fn empty(image_name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            result: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Highest ranked person.
    pub fn best(&self) -> Option<&PersonResult> {
        self.result.first()
    }
}
