use {
    crate::InferError,
    base::{Rect, Tensor, Vec2},
    image::{Image, PixelFormat},
};

// box padding applied around every detection
const SCALE_MULT: f32 = 1.25;

// per channel RGB means subtracted after scaling to [0, 1]
const CHANNEL_MEAN: [f32; 3] = [0.406, 0.457, 0.480];

/// Uniform similarity between an image region and the network input.
///
/// `center` and `scale` describe the region in image pixels; `scale` has
/// the network aspect ratio, so one factor maps both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropTransform {
    pub center: Vec2<f32>,
    pub scale: Vec2<f32>,
    pub input_size: Vec2<usize>,
}

impl CropTransform {
    /// Center/scale for a detection box: grow the short side to the input
    /// aspect ratio, then pad both by 1.25. `None` for an empty box.
    pub fn from_box(bbox: &Rect<f32>, input_size: Vec2<usize>) -> Option<Self> {
        let (mut w, mut h) = (bbox.size.x, bbox.size.y);
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return None;
        }
        if input_size.x == 0 || input_size.y == 0 {
            return None;
        }
        let aspect = input_size.x as f32 / input_size.y as f32;
        let center = Vec2::new(bbox.origin.x + w * 0.5, bbox.origin.y + h * 0.5);
        if w > aspect * h {
            h = w / aspect;
        } else if w < aspect * h {
            w = h * aspect;
        }
        Some(Self {
            center,
            scale: Vec2::new(w * SCALE_MULT, h * SCALE_MULT),
            input_size,
        })
    }

    /// The image region actually covered by the crop.
    pub fn cropped_box(&self) -> Rect<f32> {
        Rect::new(self.center - self.scale * 0.5, self.scale)
    }

    fn factor(&self) -> f32 {
        self.input_size.x as f32 / self.scale.x
    }

    /// Image pixel to network input pixel.
    pub fn to_input(&self, p: Vec2<f32>) -> Vec2<f32> {
        let half = Vec2::new(self.input_size.x as f32, self.input_size.y as f32) * 0.5;
        (p - self.center) * self.factor() + half
    }

    /// Network input pixel to image pixel.
    pub fn to_image(&self, p: Vec2<f32>) -> Vec2<f32> {
        let half = Vec2::new(self.input_size.x as f32, self.input_size.y as f32) * 0.5;
        (p - half) / self.factor() + self.center
    }

    /// Heatmap cell coordinate to image pixel, for a heatmap covering the crop.
    pub fn from_heatmap(&self, p: Vec2<f32>, heatmap_size: Vec2<usize>) -> Vec2<f32> {
        let (hm_w, hm_h) = (heatmap_size.x as f32, heatmap_size.y as f32);
        let per_cell = self.scale.x / hm_w;
        Vec2::new(
            self.center.x + (p.x - hm_w * 0.5) * per_cell,
            self.center.y + (p.y - hm_h * 0.5) * per_cell,
        )
    }
}

/// Normalized [3, H, W] network input plus the mapping back to the image.
#[derive(Debug, Clone)]
pub struct CroppedInput {
    pub tensor: Tensor<f32>,
    pub transform: CropTransform,
}

#[derive(Debug, Clone, Copy)]
pub struct CropNormalizer {
    input_size: Vec2<usize>,
}

impl CropNormalizer {
    /// `input_size` is (width, height).
    pub fn new(input_size: Vec2<usize>) -> Self {
        Self { input_size }
    }

    pub fn input_size(&self) -> Vec2<usize> {
        self.input_size
    }

    /// Warp the box region to the input size (bilinear, black outside the
    /// image) and normalize. `Ok(None)` for an empty box.
    pub fn crop(&self, image: &Image, bbox: &Rect<f32>) -> Result<Option<CroppedInput>, InferError> {
        image.format.ensure_format(PixelFormat::Rgb8)?;
        let Some(transform) = CropTransform::from_box(bbox, self.input_size) else {
            return Ok(None);
        };

        let (out_w, out_h) = (self.input_size.x, self.input_size.y);
        let (src_w, src_h) = (image.size.x as isize, image.size.y as isize);
        let plane = out_w * out_h;
        let mut data = vec![0.0f32; 3 * plane];
        let pixel = |x: isize, y: isize, ch: usize| -> f32 {
            if x < 0 || y < 0 || x >= src_w || y >= src_h {
                0.0
            } else {
                image.data[((y * src_w + x) as usize) * 3 + ch] as f32
            }
        };

        for v in 0..out_h {
            for u in 0..out_w {
                let src = transform.to_image(Vec2::new(u as f32, v as f32));
                let (x0, y0) = (src.x.floor(), src.y.floor());
                let (fx, fy) = (src.x - x0, src.y - y0);
                let (x0, y0) = (x0 as isize, y0 as isize);
                for (ch, mean) in CHANNEL_MEAN.iter().enumerate() {
                    let top = pixel(x0, y0, ch) * (1.0 - fx) + pixel(x0 + 1, y0, ch) * fx;
                    let bottom =
                        pixel(x0, y0 + 1, ch) * (1.0 - fx) + pixel(x0 + 1, y0 + 1, ch) * fx;
                    let value = top * (1.0 - fy) + bottom * fy;
                    data[ch * plane + v * out_w + u] = value / 255.0 - mean;
                }
            }
        }

        Ok(Some(CroppedInput {
            tensor: Tensor::new(vec![3, out_h, out_w], data)?,
            transform,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_box_grows_height() {
        let bbox = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(300.0, 100.0));
        let t = CropTransform::from_box(&bbox, Vec2::new(192, 256)).unwrap();
        assert_eq!(t.center, Vec2::new(150.0, 50.0));
        assert!((t.scale.x - 375.0).abs() < 1e-3);
        assert!((t.scale.y - 500.0).abs() < 1e-3);
    }

    #[test]
    fn empty_box_has_no_transform() {
        let bbox = Rect::new(Vec2::new(10.0, 10.0), Vec2::new(0.0, 50.0));
        assert!(CropTransform::from_box(&bbox, Vec2::new(192, 256)).is_none());
    }
}
