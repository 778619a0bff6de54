use {
    base::{Rect, Vec2},
    inference::{
        CropTransform, DataPreset, DecoderKind, HeatmapDecoder, InferError, LossType, NormType,
    },
};

const EPS: f32 = 1e-3;
const HM: Vec2<usize> = Vec2 { x: 48, y: 64 };

fn transform() -> CropTransform {
    let bbox = Rect::new(Vec2::new(100.0, 40.0), Vec2::new(120.0, 300.0));
    CropTransform::from_box(&bbox, Vec2::new(192, 256)).unwrap()
}

// one peak per joint, no neighbors, so no sub-cell refinement applies
fn peaked_maps(peaks: &[(usize, usize, f32)]) -> Vec<f32> {
    let mut maps = vec![0.0; peaks.len() * HM.x * HM.y];
    for (j, &(x, y, v)) in peaks.iter().enumerate() {
        maps[j * HM.x * HM.y + y * HM.x + x] = v;
    }
    maps
}

#[test]
fn test_single_peak_decodes_exactly() {
    let t = transform();
    let peaks = [(24, 32, 0.8), (10, 20, 0.6), (40, 5, 0.95)];
    let decoder = HeatmapDecoder::new(DecoderKind::Heatmap, peaks.len());
    let decoded = decoder.decode(&peaked_maps(&peaks), HM, &t).unwrap();
    for (j, &(x, y, v)) in peaks.iter().enumerate() {
        let expected = t.from_heatmap(Vec2::new(x as f32, y as f32), HM);
        assert!((decoded.keypoints[j] - expected).length() < EPS);
        assert_eq!(decoded.scores[j], v);
    }
    assert!((decoded.keypoints[0] - Vec2::new(160.0, 190.0)).length() < EPS);
}

#[test]
fn test_regression_decodes_peak_with_divide_sum() {
    let t = transform();
    let peaks = [(7, 50, 3.0)];
    let decoder = HeatmapDecoder::new(
        DecoderKind::Regression {
            norm: NormType::DivideSum,
        },
        1,
    );
    let decoded = decoder.decode(&peaked_maps(&peaks), HM, &t).unwrap();
    let expected = t.from_heatmap(Vec2::new(7.0, 50.0), HM);
    assert!((decoded.keypoints[0] - expected).length() < EPS);
    assert_eq!(decoded.scores[0], 1.0);
}

#[test]
fn test_combined_split_sizes() {
    assert_eq!(DecoderKind::combined_suffix(68), 42);
    assert_eq!(DecoderKind::combined_suffix(133), 110);
    assert_eq!(DecoderKind::combined_suffix(136), 110);
    assert_eq!(
        DecoderKind::resolve(LossType::Combined, NormType::Sigmoid, 68).unwrap(),
        DecoderKind::Combined {
            split_at: 26,
            norm: NormType::Sigmoid
        }
    );
    assert_eq!(
        DecoderKind::resolve(LossType::Combined, NormType::Softmax, 133).unwrap(),
        DecoderKind::Combined {
            split_at: 23,
            norm: NormType::Softmax
        }
    );
}

#[test]
fn test_combined_rejects_small_joint_sets() {
    let result = DecoderKind::resolve(LossType::Combined, NormType::Sigmoid, 26);
    assert!(matches!(result, Err(InferError::UnsupportedJoints(26))));
}

#[test]
fn test_combined_visibility_thresholds() {
    let j = DataPreset::Halpe136.num_joints();
    let kind = DecoderKind::resolve(LossType::Combined, NormType::Sigmoid, j).unwrap();
    let thresholds = HeatmapDecoder::new(kind, j).visibility_thresholds();
    assert_eq!(thresholds.len(), 136);
    assert_eq!(thresholds[25], 0.4);
    assert_eq!(thresholds[26], 0.05);
    assert_eq!(thresholds[135], 0.05);
}

#[test]
fn test_combined_decodes_halves_differently() {
    let t = transform();
    // prefix joint 0 read by argmax, suffix joint 1 by expectation over two cells
    let mut maps = vec![0.0; 2 * HM.x * HM.y];
    maps[20 * HM.x + 10] = 0.7;
    let suffix = &mut maps[HM.x * HM.y..];
    suffix[30 * HM.x + 10] = 1.0;
    suffix[30 * HM.x + 20] = 1.0;
    let decoder = HeatmapDecoder::new(
        DecoderKind::Combined {
            split_at: 1,
            norm: NormType::DivideSum,
        },
        2,
    );
    let decoded = decoder.decode(&maps, HM, &t).unwrap();
    assert_eq!(decoded.scores, vec![0.7, 1.0]);
    let expected = t.from_heatmap(Vec2::new(15.0, 30.0), HM);
    assert!((decoded.keypoints[1] - expected).length() < EPS);
}

#[test]
fn test_wrong_channel_count_is_shape_error() {
    let decoder = HeatmapDecoder::new(DecoderKind::Heatmap, 17);
    let result = decoder.decode(&vec![0.0; 16 * HM.x * HM.y], HM, &transform());
    assert!(matches!(result, Err(InferError::Shape(_))));
}

#[test]
fn test_loss_and_norm_names() {
    let loss: LossType = serde_json::from_str("\"combined\"").unwrap();
    assert_eq!(loss, LossType::Combined);
    let norm: NormType = serde_json::from_str("\"divide_sum\"").unwrap();
    assert_eq!(norm, NormType::DivideSum);
    let preset: DataPreset = serde_json::from_str("\"halpe_26\"").unwrap();
    assert_eq!(preset, DataPreset::Halpe26);
}
