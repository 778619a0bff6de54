use base::{Rect, Vec2};

/// The COCO body joints. Every supported preset starts with these 17.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CocoJoint {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl From<CocoJoint> for usize {
    fn from(joint: CocoJoint) -> usize {
        joint as usize
    }
}

/// One decoded person hypothesis, in image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseEstimate {
    pub keypoints: Vec<Vec2<f32>>,
    pub scores: Vec<f32>,
    /// detection box the crop was made from
    pub bbox: Rect<f32>,
    pub box_score: f32,
    pub track_id: usize,
}

impl PoseEstimate {
    /// mean(joint scores) + box score + 1.25 * max(joint score)
    pub fn proposal_score(&self) -> f32 {
        proposal_score(&self.scores, self.box_score)
    }
}

/// A pose that survived merging.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredPose {
    pub keypoints: Vec<Vec2<f32>>,
    pub scores: Vec<f32>,
    pub bbox: Rect<f32>,
    pub box_score: f32,
    pub proposal_score: f32,
    pub track_id: usize,
}

impl From<FilteredPose> for PoseEstimate {
    fn from(pose: FilteredPose) -> Self {
        Self {
            keypoints: pose.keypoints,
            scores: pose.scores,
            bbox: pose.bbox,
            box_score: pose.box_score,
            track_id: pose.track_id,
        }
    }
}

pub(crate) fn proposal_score(scores: &[f32], box_score: f32) -> f32 {
    if scores.is_empty() {
        return box_score;
    }
    let mean = scores.iter().sum::<f32>() / scores.len() as f32;
    let max = scores.iter().copied().fold(f32::MIN, f32::max);
    mean + box_score + 1.25 * max
}
