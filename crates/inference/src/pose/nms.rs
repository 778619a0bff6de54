use {
    crate::{FilteredPose, PoseEstimate, pose::types::proposal_score},
    base::{Rect, Vec2},
};

/// Parameters of parametric pose NMS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NmsParams {
    pub delta1: f32,
    pub mu: f32,
    pub delta2: f32,
    /// similarity above which a candidate is the same person
    pub gamma: f32,
    /// minimum peak joint score, heatmap scores only
    pub score_threshold: f32,
    /// matched joints at which a candidate is the same person
    pub match_threshold: usize,
    /// reference distance as a fraction of the larger box side
    pub alpha: f32,
}

impl Default for NmsParams {
    fn default() -> Self {
        Self {
            delta1: 1.0,
            mu: 1.7,
            delta2: 2.65,
            gamma: 22.48,
            score_threshold: 0.3,
            match_threshold: 5,
            alpha: 0.1,
        }
    }
}

const MIN_JOINT_SCORE: f32 = 1e-5;
const MATCH_DIST_CAP: f32 = 7.0;
const MERGE_DIST_CAP: f32 = 15.0;
const AREA_PAD: f32 = 1.5 * 1.5;

/// Collapses pose hypotheses of the same person into one.
///
/// The best remaining candidate (by proposal score) claims every candidate
/// that is similar enough or shares enough joints with it. The claimed
/// cluster is merged into one pose by score weighted averaging.
#[derive(Debug, Clone)]
pub struct MultiPersonMerger {
    params: NmsParams,
    min_box_area: f32,
    heatmap_scores: bool,
}

impl MultiPersonMerger {
    pub fn new(min_box_area: f32, heatmap_scores: bool) -> Self {
        Self {
            params: NmsParams::default(),
            min_box_area,
            heatmap_scores,
        }
    }

    pub fn with_params(mut self, params: NmsParams) -> Self {
        self.params = params;
        self
    }

    /// Survivors, sorted by descending proposal score.
    ///
    /// A merged pose moves toward the members of its cluster and can end up
    /// matching a survivor it did not match before, so passes repeat until
    /// the number of poses stops changing. Merging the result again returns
    /// it unchanged.
    pub fn merge(&self, poses: &[PoseEstimate]) -> Vec<FilteredPose> {
        let mut merged = self.merge_once(poses);
        loop {
            let again: Vec<PoseEstimate> = merged.iter().cloned().map(PoseEstimate::from).collect();
            let again = self.merge_once(&again);
            if again.len() == merged.len() {
                return again;
            }
            merged = again;
        }
    }

    fn merge_once(&self, poses: &[PoseEstimate]) -> Vec<FilteredPose> {
        let num_joints = poses
            .iter()
            .find(|p| !p.keypoints.is_empty())
            .map_or(0, |p| p.keypoints.len());
        let poses: Vec<PoseEstimate> = poses
            .iter()
            .filter(|p| {
                let valid = p.keypoints.len() == num_joints && p.scores.len() == num_joints;
                if !valid && !p.keypoints.is_empty() {
                    log::warn!(
                        "dropping pose {} with {} joints and {} scores, expected {}",
                        p.track_id,
                        p.keypoints.len(),
                        p.scores.len(),
                        num_joints
                    );
                }
                valid && num_joints > 0
            })
            .map(|p| PoseEstimate {
                scores: p
                    .scores
                    .iter()
                    .map(|&s| if s == 0.0 { MIN_JOINT_SCORE } else { s })
                    .collect(),
                ..p.clone()
            })
            .collect();
        let ref_dists: Vec<f32> = poses
            .iter()
            .map(|p| self.params.alpha * p.bbox.size.x.max(p.bbox.size.y))
            .collect();
        let ranks: Vec<f32> = poses.iter().map(|p| p.proposal_score()).collect();

        let mut alive: Vec<usize> = (0..poses.len()).collect();
        let mut picks = Vec::new();
        while !alive.is_empty() {
            let pick = alive
                .iter()
                .copied()
                .fold(alive[0], |best, i| if ranks[i] > ranks[best] { i } else { best });
            let ref_dist = ref_dists[pick];
            let mut cluster: Vec<usize> = alive
                .iter()
                .copied()
                .filter(|&i| {
                    self.similarity(&poses[pick], &poses[i]) > self.params.gamma
                        || matched_joints(&poses[pick], &poses[i], ref_dist)
                            >= self.params.match_threshold
                })
                .collect();
            if !cluster.contains(&pick) {
                cluster.push(pick);
            }
            alive.retain(|i| !cluster.contains(i));
            picks.push((pick, cluster));
        }

        let mut result = Vec::new();
        for (pick, cluster) in picks {
            let pose = &poses[pick];
            if self.heatmap_scores && max_score(&pose.scores) < self.params.score_threshold {
                continue;
            }
            let cluster: Vec<&PoseEstimate> = cluster.iter().map(|&i| &poses[i]).collect();
            let (keypoints, scores) = merge_cluster(pose, &cluster, ref_dists[pick]);
            if self.heatmap_scores && max_score(&scores) < self.params.score_threshold {
                continue;
            }
            let extent = keypoint_extent(&keypoints);
            if AREA_PAD * extent.area() < self.min_box_area {
                continue;
            }
            result.push(FilteredPose {
                proposal_score: proposal_score(&scores, pose.box_score),
                keypoints,
                scores,
                bbox: pose.bbox,
                box_score: pose.box_score,
                track_id: pose.track_id,
            });
        }
        result.sort_by(|a, b| b.proposal_score.total_cmp(&a.proposal_score));
        result
    }

    /// Score agreement of joints within one pixel plus a soft count of
    /// nearby joints.
    fn similarity(&self, pick: &PoseEstimate, other: &PoseEstimate) -> f32 {
        let p = &self.params;
        let mut score_dist = 0.0;
        let mut point_dist = 0.0;
        for j in 0..pick.keypoints.len() {
            let dist = pick.keypoints[j].distance_to(other.keypoints[j]);
            if dist <= 1.0 {
                score_dist += (pick.scores[j] / p.delta1).tanh() * (other.scores[j] / p.delta1).tanh();
            }
            point_dist += (-dist / p.delta2).exp();
        }
        score_dist + p.mu * point_dist
    }
}

fn matched_joints(pick: &PoseEstimate, other: &PoseEstimate, ref_dist: f32) -> usize {
    let ref_dist = ref_dist.min(MATCH_DIST_CAP);
    pick.keypoints
        .iter()
        .zip(&other.keypoints)
        .filter(|(a, b)| a.distance_to(**b) / ref_dist <= 1.0)
        .count()
}

/// Per joint, average the cluster's positions that lie within the capped
/// reference distance of the pick, weighted by their scores.
fn merge_cluster(
    pick: &PoseEstimate,
    cluster: &[&PoseEstimate],
    ref_dist: f32,
) -> (Vec<Vec2<f32>>, Vec<f32>) {
    let ref_dist = ref_dist.min(MERGE_DIST_CAP);
    let mut keypoints = Vec::with_capacity(pick.keypoints.len());
    let mut scores = Vec::with_capacity(pick.keypoints.len());
    for j in 0..pick.keypoints.len() {
        let members: Vec<(Vec2<f32>, f32)> = cluster
            .iter()
            .filter(|c| c.keypoints[j].distance_to(pick.keypoints[j]) <= ref_dist)
            .map(|c| (c.keypoints[j], c.scores[j]))
            .collect();
        let total: f32 = members.iter().map(|m| m.1).sum();
        if members.is_empty() || total <= 0.0 {
            keypoints.push(pick.keypoints[j]);
            scores.push(pick.scores[j]);
            continue;
        }
        let mut position = Vec2::new(0.0, 0.0);
        let mut score = 0.0;
        for (p, s) in members {
            let weight = s / total;
            position = position + p * weight;
            score += s * weight;
        }
        keypoints.push(position);
        scores.push(score);
    }
    (keypoints, scores)
}

fn max_score(scores: &[f32]) -> f32 {
    scores.iter().copied().fold(f32::MIN, f32::max)
}

fn keypoint_extent(keypoints: &[Vec2<f32>]) -> Rect<f32> {
    let (mut min, mut max) = (Vec2::new(f32::MAX, f32::MAX), Vec2::new(f32::MIN, f32::MIN));
    for p in keypoints {
        min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
        max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
    }
    Rect::from_min_max(min, max)
}
