use {
    crate::{CropTransform, InferError},
    base::Vec2,
    serde::Deserialize,
};

const HEATMAP_VISIBILITY: f32 = 0.4;
const REGRESSION_VISIBILITY: f32 = 0.05;

/// Training loss of the pose model, which decides how its maps are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Heatmap,
    Regression,
    #[default]
    Combined,
}

/// Normalization applied to a map before integral (soft-argmax) decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormType {
    #[default]
    Sigmoid,
    Softmax,
    DivideSum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderKind {
    /// argmax with quarter pixel refinement, score is the peak value
    Heatmap,
    /// expected position of the normalized map
    Regression { norm: NormType },
    /// joints before `split_at` decoded as `Heatmap`, the rest as `Regression`
    Combined { split_at: usize, norm: NormType },
}

impl DecoderKind {
    /// Number of face+hand joints decoded by regression in a combined model.
    pub fn combined_suffix(num_joints: usize) -> usize {
        if num_joints == 68 { 42 } else { 110 }
    }

    pub fn resolve(loss: LossType, norm: NormType, num_joints: usize) -> Result<Self, InferError> {
        match loss {
            LossType::Heatmap => Ok(DecoderKind::Heatmap),
            LossType::Regression => Ok(DecoderKind::Regression { norm }),
            LossType::Combined => {
                let suffix = Self::combined_suffix(num_joints);
                if num_joints <= suffix {
                    return Err(InferError::UnsupportedJoints(num_joints));
                }
                Ok(DecoderKind::Combined {
                    split_at: num_joints - suffix,
                    norm,
                })
            }
        }
    }
}

/// Keypoints of one crop in image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub keypoints: Vec<Vec2<f32>>,
    pub scores: Vec<f32>,
}

#[derive(Debug, Clone)]
pub struct HeatmapDecoder {
    kind: DecoderKind,
    num_joints: usize,
}

impl HeatmapDecoder {
    pub fn new(kind: DecoderKind, num_joints: usize) -> Self {
        Self { kind, num_joints }
    }

    pub fn kind(&self) -> DecoderKind {
        self.kind
    }

    pub fn num_joints(&self) -> usize {
        self.num_joints
    }

    /// Scores are raw heatmap peaks for every joint.
    pub fn uses_heatmap_scores(&self) -> bool {
        self.kind == DecoderKind::Heatmap
    }

    /// Per joint score above which a joint counts as visible.
    pub fn visibility_thresholds(&self) -> Vec<f32> {
        match self.kind {
            DecoderKind::Heatmap => vec![HEATMAP_VISIBILITY; self.num_joints],
            DecoderKind::Regression { .. } => vec![REGRESSION_VISIBILITY; self.num_joints],
            DecoderKind::Combined { split_at, .. } => (0..self.num_joints)
                .map(|j| if j < split_at { HEATMAP_VISIBILITY } else { REGRESSION_VISIBILITY })
                .collect(),
        }
    }

    /// Decode one crop's [J, H, W] maps, given as a flat slice.
    pub fn decode(
        &self,
        maps: &[f32],
        heatmap_size: Vec2<usize>,
        transform: &CropTransform,
    ) -> Result<Decoded, InferError> {
        let (w, h) = (heatmap_size.x, heatmap_size.y);
        if w == 0 || h == 0 || maps.len() != self.num_joints * w * h {
            return Err(InferError::Shape(format!(
                "expected {} maps of {}x{}, got {} values",
                self.num_joints,
                w,
                h,
                maps.len()
            )));
        }

        let mut keypoints = Vec::with_capacity(self.num_joints);
        let mut scores = Vec::with_capacity(self.num_joints);
        for (j, channel) in maps.chunks_exact(w * h).enumerate() {
            let (p, score) = match self.kind {
                DecoderKind::Heatmap => decode_argmax(channel, w, h),
                DecoderKind::Regression { norm } => decode_integral(channel, w, h, norm),
                DecoderKind::Combined { split_at, norm } => {
                    if j < split_at {
                        decode_argmax(channel, w, h)
                    } else {
                        decode_integral(channel, w, h, norm)
                    }
                }
            };
            keypoints.push(transform.from_heatmap(p, heatmap_size));
            scores.push(score);
        }
        Ok(Decoded { keypoints, scores })
    }
}

/// Peak location and value. A non-positive peak decodes to (0, 0).
/// Interior peaks move a quarter cell towards the higher neighbor.
pub fn decode_argmax(channel: &[f32], w: usize, h: usize) -> (Vec2<f32>, f32) {
    let (index, maxval) = channel
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::MIN), |best, c| if c.1 > best.1 { c } else { best });
    if maxval <= 0.0 {
        return (Vec2::zero(), maxval);
    }
    let (px, py) = (index % w, index / w);
    let mut p = Vec2::new(px as f32, py as f32);
    if px > 1 && px + 1 < w && py > 1 && py + 1 < h {
        let at = |x: usize, y: usize| channel[y * w + x];
        p.x += 0.25 * signum(at(px + 1, py) - at(px - 1, py));
        p.y += 0.25 * signum(at(px, py + 1) - at(px, py - 1));
    }
    (p, maxval)
}

/// Expected location of the normalized map. The score is the peak of the
/// sigmoid map, or 1 for the other norms.
pub fn decode_integral(channel: &[f32], w: usize, h: usize, norm: NormType) -> (Vec2<f32>, f32) {
    let normed: Vec<f32> = match norm {
        NormType::Sigmoid => channel.iter().map(|&v| 1.0 / (1.0 + (-v).exp())).collect(),
        NormType::Softmax => {
            let max = channel.iter().copied().fold(f32::MIN, f32::max);
            channel.iter().map(|&v| (v - max).exp()).collect()
        }
        NormType::DivideSum => channel.to_vec(),
    };
    let score = match norm {
        NormType::Sigmoid => normed.iter().copied().fold(0.0, f32::max),
        NormType::Softmax | NormType::DivideSum => 1.0,
    };

    let total: f32 = normed.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return (Vec2::zero(), 0.0);
    }
    let (mut sx, mut sy) = (0.0f32, 0.0f32);
    for y in 0..h {
        for x in 0..w {
            let v = normed[y * w + x];
            sx += v * x as f32;
            sy += v * y as f32;
        }
    }
    (Vec2::new(sx / total, sy / total), score)
}

fn signum(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_refines_towards_higher_neighbor() {
        let (w, h) = (8, 8);
        let mut map = vec![0.0; w * h];
        map[4 * w + 4] = 1.0;
        map[4 * w + 5] = 0.5;
        map[3 * w + 4] = 0.2;
        let (p, score) = decode_argmax(&map, w, h);
        assert_eq!(p, Vec2::new(4.25, 3.75));
        assert_eq!(score, 1.0);
    }

    #[test]
    fn argmax_on_border_is_not_refined() {
        let (w, h) = (8, 8);
        let mut map = vec![0.0; w * h];
        map[w + 6] = 0.9;
        map[w + 7] = 0.3;
        let (p, _) = decode_argmax(&map, w, h);
        assert_eq!(p, Vec2::new(6.0, 1.0));
    }

    #[test]
    fn negative_peak_decodes_to_origin() {
        let map = vec![-1.0; 16];
        let (p, score) = decode_argmax(&map, 4, 4);
        assert_eq!(p, Vec2::zero());
        assert_eq!(score, -1.0);
    }

    #[test]
    fn integral_of_symmetric_blob_is_its_center() {
        let (w, h) = (9, 7);
        let mut map = vec![0.0; w * h];
        for (dx, dy, v) in [(0, 0, 4.0), (-1, 0, 1.0), (1, 0, 1.0), (0, -1, 2.0), (0, 1, 2.0)] {
            map[((3 + dy) as usize) * w + (5 + dx) as usize] = v;
        }
        let (p, score) = decode_integral(&map, w, h, NormType::DivideSum);
        assert!((p.x - 5.0).abs() < 1e-5 && (p.y - 3.0).abs() < 1e-5);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn all_zero_map_has_no_integral() {
        let (p, score) = decode_integral(&[0.0; 12], 4, 3, NormType::DivideSum);
        assert_eq!(p, Vec2::zero());
        assert_eq!(score, 0.0);
    }
}
