use {
    crate::{InferError, onnx::OnnxModel},
    base::{Rect, Tensor, Vec2},
    image::{Image, PixelFormat},
};

pub const PERSON_CLASS: usize = 0;

const TARGET_SIZE: usize = 640;
const PAD_COLOR: f32 = 114.0 / 255.0; // gray padding in normalized range

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub bbox: Rect<f32>,
    pub score: f32,
    pub class_id: usize,
}

/// Maps an image to scored, classed boxes in image coordinates.
pub trait PersonDetector: Send {
    fn detect(&mut self, image: &Image) -> Result<Vec<Detection>, InferError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

impl Letterbox {
    /// Map a point from model input space back to the source image.
    pub fn unmap(&self, p: Vec2<f32>) -> Vec2<f32> {
        Vec2::new((p.x - self.pad_x) / self.scale, (p.y - self.pad_y) / self.scale)
    }
}

/// Letterbox an RGB image into a [1, 3, 640, 640] tensor in [0, 1].
pub fn letterbox(image: &Image) -> Result<(Tensor<f32>, Letterbox), InferError> {
    image.format.ensure_format(PixelFormat::Rgb8)?;
    let (w, h) = (image.size.x, image.size.y);
    if w == 0 || h == 0 {
        return Err(InferError::Shape(format!("empty image {}x{}", w, h)));
    }

    let scale = (TARGET_SIZE as f32 / w as f32).min(TARGET_SIZE as f32 / h as f32);
    let new_w = ((w as f32 * scale) as usize).min(TARGET_SIZE);
    let new_h = ((h as f32 * scale) as usize).min(TARGET_SIZE);
    let pad_x = (TARGET_SIZE - new_w) / 2;
    let pad_y = (TARGET_SIZE - new_h) / 2;

    let plane = TARGET_SIZE * TARGET_SIZE;
    let mut data = vec![PAD_COLOR; 3 * plane];
    for out_y in 0..new_h {
        // nearest neighbor
        let src_y = ((out_y as f32 / scale) as usize).min(h - 1);
        for out_x in 0..new_w {
            let src_x = ((out_x as f32 / scale) as usize).min(w - 1);
            let src = (src_y * w + src_x) * 3;
            let dst = (out_y + pad_y) * TARGET_SIZE + out_x + pad_x;
            for ch in 0..3 {
                data[ch * plane + dst] = image.data[src + ch] as f32 / 255.0;
            }
        }
    }

    let tensor = Tensor::new(vec![1, 3, TARGET_SIZE, TARGET_SIZE], data)?;
    Ok((
        tensor,
        Letterbox {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
        },
    ))
}

/// Greedy IoU suppression, done separately per class. Output is sorted by score.
pub fn nms(mut candidates: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut suppressed = vec![false; candidates.len()];
    let mut keep = Vec::new();
    for i in 0..candidates.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(candidates[i]);
        for j in (i + 1)..candidates.len() {
            if !suppressed[j]
                && candidates[j].class_id == candidates[i].class_id
                && candidates[i].bbox.iou(&candidates[j].bbox) > iou_threshold
            {
                suppressed[j] = true;
            }
        }
    }
    keep
}

/// Decode a [1, 4 + classes, N] output (cx, cy, w, h, class scores per anchor),
/// filter by confidence, suppress overlaps and clip boxes to the image.
pub fn postprocess(
    output: &Tensor<f32>,
    letterbox: &Letterbox,
    image_size: Vec2<usize>,
    conf_threshold: f32,
    nms_threshold: f32,
) -> Result<Vec<Detection>, InferError> {
    if output.shape.len() != 3 || output.shape[0] != 1 || output.shape[1] < 5 {
        return Err(InferError::Shape(format!(
            "expected [1, 4 + classes, N], got {:?}",
            output.shape
        )));
    }
    let rows = output.shape[1];
    let n = output.shape[2];
    let at = |row: usize, i: usize| output.data[row * n + i];
    let (img_w, img_h) = (image_size.x as f32, image_size.y as f32);

    let mut candidates = Vec::new();
    for i in 0..n {
        let (class_id, score) = (4..rows)
            .map(|row| (row - 4, at(row, i)))
            .fold((0, f32::MIN), |best, c| if c.1 > best.1 { c } else { best });
        if score < conf_threshold {
            continue;
        }
        let (cx, cy, w, h) = (at(0, i), at(1, i), at(2, i), at(3, i));
        let min = letterbox.unmap(Vec2::new(cx - w / 2.0, cy - h / 2.0));
        let max = letterbox.unmap(Vec2::new(cx + w / 2.0, cy + h / 2.0));
        let min = Vec2::new(min.x.clamp(0.0, img_w), min.y.clamp(0.0, img_h));
        let max = Vec2::new(max.x.clamp(0.0, img_w), max.y.clamp(0.0, img_h));
        candidates.push(Detection {
            bbox: Rect::from_min_max(min, max),
            score,
            class_id,
        });
    }

    Ok(nms(candidates, nms_threshold))
}

/// YOLO-style ONNX detector.
pub struct YoloDetector {
    model: OnnxModel,
    conf_threshold: f32,
    nms_threshold: f32,
}

impl YoloDetector {
    pub fn new(model: OnnxModel) -> Self {
        Self {
            model,
            conf_threshold: 0.1,
            nms_threshold: 0.6,
        }
    }

    pub fn with_conf_threshold(mut self, threshold: f32) -> Self {
        self.conf_threshold = threshold;
        self
    }

    pub fn with_nms_threshold(mut self, threshold: f32) -> Self {
        self.nms_threshold = threshold;
        self
    }
}

impl PersonDetector for YoloDetector {
    fn detect(&mut self, image: &Image) -> Result<Vec<Detection>, InferError> {
        let (input, letterbox) = letterbox(image)?;
        let output = self.model.run(input)?;
        postprocess(
            &output,
            &letterbox,
            image.size,
            self.conf_threshold,
            self.nms_threshold,
        )
    }
}
