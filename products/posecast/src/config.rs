use {
    anyhow::{Context, Result},
    base::Vec2,
    inference::{DataPreset, Device, LossType, NormType},
    serde::Deserialize,
    std::path::{Path, PathBuf},
    video::{VideoInConfig, videoin::still::StillConfig},
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub width: usize,
    pub height: usize,
    pub frame_rate: f32,
    /// replay this image instead of opening the depth camera
    pub image: Option<PathBuf>,
    /// constant depth plane for the replayed image, in meters
    pub depth_meters: Option<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            frame_rate: 30.0,
            image: None,
            depth_meters: None,
        }
    }
}

/// World frame basis vectors (as seen from the camera) and the translation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub basis: [[f32; 3]; 3],
    pub translation: [f32; 3],
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            basis: [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]],
            translation: [0.0, 0.0, 1.32],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub detector_model: PathBuf,
    pub pose_model: PathBuf,
    pub preset: DataPreset,
    pub loss: LossType,
    pub norm_type: NormType,
    pub device: String,
    pub flip: bool,
    pub profile: bool,
    pub min_box_area: f32,
    pub conf_threshold: f32,
    pub nms_threshold: f32,
    pub camera: CameraConfig,
    pub transform: TransformConfig,
    pub joints: Vec<usize>,
    pub publish_addr: String,
    pub publish_rate_hz: f32,
    pub results_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector_model: PathBuf::from("data/yolo/yolov8n.onnx"),
            pose_model: PathBuf::from("data/alphapose/halpe136_fast50.onnx"),
            preset: DataPreset::default(),
            loss: LossType::default(),
            norm_type: NormType::default(),
            device: "cpu".to_string(),
            flip: false,
            profile: false,
            min_box_area: 0.0,
            conf_threshold: 0.1,
            nms_threshold: 0.6,
            camera: CameraConfig::default(),
            transform: TransformConfig::default(),
            // left elbow, right elbow, left wrist, right wrist
            joints: vec![7, 8, 9, 10],
            publish_addr: "0.0.0.0:5091".to_string(),
            publish_rate_hz: 10.0,
            results_path: None,
            log_dir: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no component can run with.
    pub fn validate(&self) -> Result<()> {
        if self.publish_rate_hz.is_nan() || self.publish_rate_hz <= 0.0 {
            anyhow::bail!("publish_rate_hz must be positive, got {}", self.publish_rate_hz);
        }
        if self.camera.width < 2 || self.camera.height < 2 {
            anyhow::bail!(
                "camera size {}x{} is too small",
                self.camera.width,
                self.camera.height
            );
        }
        if self.joints.is_empty() {
            anyhow::bail!("no joints selected for publishing");
        }
        let num_joints = self.preset.num_joints();
        if let Some(&joint) = self.joints.iter().find(|&&j| j >= num_joints) {
            anyhow::bail!("joint {} out of range for a {}-joint preset", joint, num_joints);
        }
        self.device()?;
        Ok(())
    }

    pub fn device(&self) -> Result<Device> {
        Ok(self.device.parse::<Device>()?)
    }

    pub fn camera_size(&self) -> Vec2<usize> {
        Vec2::new(self.camera.width, self.camera.height)
    }

    /// Still image replay when `camera.image` is set, the depth camera otherwise.
    pub fn video_config(&self) -> Result<VideoInConfig> {
        if let Some(path) = &self.camera.image {
            let still =
                StillConfig::from_path(path, self.camera.depth_meters, self.camera.frame_rate)?;
            return Ok(VideoInConfig::Still(still));
        }
        self.camera_config()
    }

    #[cfg(feature = "realsense")]
    fn camera_config(&self) -> Result<VideoInConfig> {
        Ok(VideoInConfig::Realsense(
            video::videoin::realsense::RealsenseConfig {
                color: Some(self.camera_size()),
                frame_rate: Some(self.camera.frame_rate),
            },
        ))
    }

    #[cfg(not(feature = "realsense"))]
    fn camera_config(&self) -> Result<VideoInConfig> {
        anyhow::bail!("no camera.image configured and depth camera support is not built in")
    }
}
