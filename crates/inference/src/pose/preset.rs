use {base::Vec2, serde::Deserialize};

const COCO_BODY_PAIRS: [(usize, usize); 8] = [
    (1, 2),
    (3, 4),
    (5, 6),
    (7, 8),
    (9, 10),
    (11, 12),
    (13, 14),
    (15, 16),
];

const HALPE_FOOT_PAIRS: [(usize, usize); 3] = [(20, 21), (22, 23), (24, 25)];

const WHOLEBODY_FOOT_PAIRS: [(usize, usize); 3] = [(17, 20), (18, 21), (19, 22)];

// 68 point face, relative to the first face joint
static FACE_PAIRS: [(usize, usize); 29] = [
    (0, 16),
    (1, 15),
    (2, 14),
    (3, 13),
    (4, 12),
    (5, 11),
    (6, 10),
    (7, 9),
    (17, 26),
    (18, 25),
    (19, 24),
    (20, 23),
    (21, 22),
    (31, 35),
    (32, 34),
    (36, 45),
    (37, 44),
    (38, 43),
    (39, 42),
    (40, 47),
    (41, 46),
    (48, 54),
    (49, 53),
    (50, 52),
    (55, 59),
    (56, 58),
    (60, 64),
    (61, 63),
    (65, 67),
];

const HAND_JOINTS: usize = 21;

/// Keypoint layout the pose model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DataPreset {
    #[serde(rename = "coco")]
    Coco,
    #[serde(rename = "halpe_26")]
    Halpe26,
    #[serde(rename = "halpe_68")]
    Halpe68,
    #[default]
    #[serde(rename = "halpe_136")]
    Halpe136,
    #[serde(rename = "coco_wholebody")]
    CocoWholebody,
}

impl DataPreset {
    pub fn num_joints(&self) -> usize {
        match self {
            DataPreset::Coco => 17,
            DataPreset::Halpe26 => 26,
            DataPreset::Halpe68 => 68,
            DataPreset::Halpe136 => 136,
            DataPreset::CocoWholebody => 133,
        }
    }

    /// Network input size as (width, height).
    pub fn input_size(&self) -> Vec2<usize> {
        Vec2::new(192, 256)
    }

    /// Heatmap size as (width, height).
    pub fn heatmap_size(&self) -> Vec2<usize> {
        Vec2::new(48, 64)
    }

    /// Left/right joint pairs swapped when un-mirroring a flipped pass.
    pub fn flip_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = COCO_BODY_PAIRS.to_vec();
        let face = |start: usize| FACE_PAIRS.iter().map(move |&(a, b)| (start + a, start + b));
        let hands = |start: usize| (0..HAND_JOINTS).map(move |i| (start + i, start + HAND_JOINTS + i));
        match self {
            DataPreset::Coco => {}
            DataPreset::Halpe26 => {
                pairs.extend(HALPE_FOOT_PAIRS);
            }
            DataPreset::Halpe68 => {
                pairs.extend(HALPE_FOOT_PAIRS);
                pairs.extend(hands(26));
            }
            DataPreset::Halpe136 => {
                pairs.extend(HALPE_FOOT_PAIRS);
                pairs.extend(face(26));
                pairs.extend(hands(94));
            }
            DataPreset::CocoWholebody => {
                pairs.extend(WHOLEBODY_FOOT_PAIRS);
                pairs.extend(face(23));
                pairs.extend(hands(91));
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_stay_in_range_and_are_disjoint() {
        for preset in [
            DataPreset::Coco,
            DataPreset::Halpe26,
            DataPreset::Halpe68,
            DataPreset::Halpe136,
            DataPreset::CocoWholebody,
        ] {
            let mut seen = vec![false; preset.num_joints()];
            for (a, b) in preset.flip_pairs() {
                assert!(a < b && b < preset.num_joints(), "{preset:?} ({a}, {b})");
                assert!(!seen[a] && !seen[b], "{preset:?} joint reused");
                seen[a] = true;
                seen[b] = true;
            }
        }
    }

    #[test]
    fn hand_pairs_cover_both_hands() {
        let pairs = DataPreset::Halpe136.flip_pairs();
        assert!(pairs.contains(&(94, 115)));
        assert!(pairs.contains(&(114, 135)));
        let pairs = DataPreset::CocoWholebody.flip_pairs();
        assert!(pairs.contains(&(91, 112)));
        assert!(pairs.contains(&(23, 39)));
    }
}
