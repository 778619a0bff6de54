use {crate::Intrinsics, base::Vec2, image::Image};

/// Z16 depth image. Raw units times `scale` gives meters.
#[derive(Debug, Clone)]
pub struct DepthImage {
    pub size: Vec2<usize>,
    pub data: Vec<u16>,
    pub scale: f32,
}

impl DepthImage {
    pub fn new(size: Vec2<usize>, data: Vec<u16>, scale: f32) -> Self {
        Self { size, data, scale }
    }

    /// Depth image filled with one distance, in millimeter units.
    pub fn constant(size: Vec2<usize>, meters: f32) -> Self {
        let raw = (meters * 1000.0).round().clamp(0.0, u16::MAX as f32) as u16;
        Self {
            size,
            data: vec![raw; size.x * size.y],
            scale: 0.001,
        }
    }

    /// Raw sample at zero-based (x, y), `None` outside the image.
    pub fn raw(&self, x: usize, y: usize) -> Option<u16> {
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        self.data.get(y * self.size.x + x).copied()
    }

    /// Distance in meters at zero-based (x, y). Zero means no reading.
    pub fn distance(&self, x: usize, y: usize) -> Option<f32> {
        self.raw(x, y).map(|raw| raw as f32 * self.scale)
    }
}

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub color: Image,
    pub depth: Option<DepthImage>,
    pub intrinsics: Intrinsics,
    /// capture time in milliseconds, device clock
    pub timestamp: f64,
}
