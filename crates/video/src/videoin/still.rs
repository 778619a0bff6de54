use {
    super::VideoInDevice,
    crate::*,
    image::Image,
    std::{
        path::Path,
        time::{Duration, Instant},
    },
};

/// Replays one image as a camera stream.
#[derive(Debug, Clone)]
pub struct StillConfig {
    pub image: Image,
    pub depth: Option<DepthImage>,
    pub intrinsics: Option<Intrinsics>,
    pub frame_rate: f32,
    /// stop with a stream error after this many frames
    pub max_frames: Option<usize>,
}

impl StillConfig {
    pub fn new(image: Image, frame_rate: f32) -> Self {
        Self {
            image,
            depth: None,
            intrinsics: None,
            frame_rate,
            max_frames: None,
        }
    }

    /// Load `path` and attach a constant depth plane at `depth_meters`, if given.
    pub fn from_path(
        path: impl AsRef<Path>,
        depth_meters: Option<f32>,
        frame_rate: f32,
    ) -> Result<Self, VideoError> {
        let image = image::load_rgb(path)?;
        let depth = depth_meters.map(|meters| DepthImage::constant(image.size, meters));
        Ok(Self {
            depth,
            ..Self::new(image, frame_rate)
        })
    }
}

pub struct Still {
    config: Option<StillConfig>,
    intrinsics: Intrinsics,
    period: Duration,
    started: Instant,
    next: Instant,
    count: usize,
}

impl Still {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            config: None,
            intrinsics: Intrinsics::nominal(0, 0),
            period: Duration::ZERO,
            started: now,
            next: now,
            count: 0,
        }
    }
}

impl Default for Still {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoInDevice for Still {
    fn open(&mut self, config: &VideoInConfig) -> Result<VideoInConfig, VideoError> {
        #[allow(irrefutable_let_patterns)]
        let VideoInConfig::Still(config) = config else {
            return Err(VideoError::Device("not a still image config".to_string()));
        };
        if config.frame_rate.is_nan() || config.frame_rate <= 0.0 {
            return Err(VideoError::Device(format!(
                "invalid frame rate {}",
                config.frame_rate
            )));
        }
        if let Some(depth) = &config.depth {
            if depth.size != config.image.size {
                return Err(VideoError::Device(format!(
                    "depth {}x{} does not match color {}x{}",
                    depth.size.x, depth.size.y, config.image.size.x, config.image.size.y
                )));
            }
        }
        let size = config.image.size;
        self.intrinsics = config
            .intrinsics
            .unwrap_or_else(|| Intrinsics::nominal(size.x, size.y));
        self.period = Duration::from_secs_f32(1.0 / config.frame_rate);
        self.started = Instant::now();
        self.next = self.started;
        self.count = 0;
        self.config = Some(config.clone());
        Ok(VideoInConfig::Still(config.clone()))
    }

    fn close(&mut self) {
        self.config = None;
    }

    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError> {
        let Some(config) = &self.config else {
            return Err(VideoError::Device("device not open".to_string()));
        };
        if config.max_frames.is_some_and(|max| self.count >= max) {
            return Err(VideoError::Stream("end of still image stream".to_string()));
        }
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        }
        self.next += self.period;
        self.count += 1;
        Ok(VideoFrame {
            color: config.image.clone(),
            depth: config.depth.clone(),
            intrinsics: self.intrinsics,
            timestamp: self.started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}
