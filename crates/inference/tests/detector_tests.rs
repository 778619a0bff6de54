use {
    base::{Rect, Tensor, Vec2},
    image::{Image, PixelFormat},
    inference::detector::{Detection, Letterbox, letterbox, nms, postprocess},
};

const EPS: f32 = 1e-3;

// [1, 4 + classes, N] from per-anchor rows of (cx, cy, w, h, scores...)
fn yolo_output(anchors: &[Vec<f32>]) -> Tensor<f32> {
    let rows = anchors[0].len();
    let n = anchors.len();
    let mut data = vec![0.0; rows * n];
    for (i, anchor) in anchors.iter().enumerate() {
        for (row, v) in anchor.iter().enumerate() {
            data[row * n + i] = *v;
        }
    }
    Tensor::new(vec![1, rows, n], data).unwrap()
}

fn identity() -> Letterbox {
    Letterbox {
        scale: 1.0,
        pad_x: 0.0,
        pad_y: 0.0,
    }
}

#[test]
fn test_letterbox_shape_and_padding() {
    let image = Image::new(Vec2::new(64, 32), vec![255; 64 * 32 * 3], PixelFormat::Rgb8);
    let (tensor, info) = letterbox(&image).unwrap();
    assert_eq!(tensor.shape, vec![1, 3, 640, 640]);
    assert_eq!(info.scale, 10.0);
    assert_eq!(info.pad_x, 0.0);
    assert_eq!(info.pad_y, 160.0);
    // padding rows stay gray, image rows are white
    assert!((tensor.data[0] - 114.0 / 255.0).abs() < 1e-6);
    assert_eq!(tensor.data[320 * 640 + 320], 1.0);
}

#[test]
fn test_letterbox_rejects_bgr() {
    let image = Image::new(Vec2::new(2, 2), vec![0; 12], PixelFormat::Bgr8);
    assert!(letterbox(&image).is_err());
}

#[test]
fn test_postprocess_filters_and_clips() {
    let output = yolo_output(&[
        vec![50.0, 50.0, 20.0, 40.0, 0.9, 0.05],
        vec![200.0, 100.0, 10.0, 10.0, 0.05, 0.08], // below threshold
        vec![5.0, 5.0, 20.0, 20.0, 0.1, 0.7],       // class 1, clipped at 0
    ]);
    let dets = postprocess(&output, &identity(), Vec2::new(640, 480), 0.1, 0.6).unwrap();
    assert_eq!(dets.len(), 2);
    assert_eq!(dets[0].class_id, 0);
    assert!((dets[0].bbox.origin.x - 40.0).abs() < EPS);
    assert!((dets[0].bbox.size.y - 40.0).abs() < EPS);
    assert_eq!(dets[1].class_id, 1);
    assert_eq!(dets[1].bbox.origin, Vec2::new(0.0, 0.0));
    assert!((dets[1].bbox.size.x - 15.0).abs() < EPS);
    for det in &dets {
        assert!(det.bbox.area() >= 0.0);
    }
}

#[test]
fn test_postprocess_unmaps_letterbox() {
    let output = yolo_output(&[vec![320.0, 320.0, 100.0, 50.0, 0.8]]);
    let info = Letterbox {
        scale: 0.5,
        pad_x: 0.0,
        pad_y: 80.0,
    };
    let dets = postprocess(&output, &info, Vec2::new(1280, 960), 0.1, 0.6).unwrap();
    assert_eq!(dets.len(), 1);
    let bbox = dets[0].bbox;
    assert!((bbox.origin.x - 540.0).abs() < EPS);
    assert!((bbox.origin.y - 430.0).abs() < EPS);
    assert!((bbox.size.x - 200.0).abs() < EPS);
    assert!((bbox.size.y - 100.0).abs() < EPS);
}

#[test]
fn test_postprocess_bad_shape() {
    let output = Tensor::new(vec![1, 4, 2], vec![0.0; 8]).unwrap();
    assert!(postprocess(&output, &identity(), Vec2::new(10, 10), 0.1, 0.6).is_err());
}

#[test]
fn test_nms_is_per_class() {
    let bbox = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    let shifted = Rect::new(Vec2::new(1.0, 0.0), Vec2::new(10.0, 10.0));
    let kept = nms(
        vec![
            Detection { bbox, score: 0.5, class_id: 0 },
            Detection { bbox: shifted, score: 0.9, class_id: 0 },
            Detection { bbox, score: 0.7, class_id: 2 },
        ],
        0.6,
    );
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0].score, 0.9);
    assert_eq!(kept[1].class_id, 2);
}
