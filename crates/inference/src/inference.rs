use {
    crate::{
        detector::YoloDetector,
        error::InferError,
        onnx::OnnxModel,
        pose::OnnxPoseEstimator,
    },
    ort::session::Session,
    std::{path::Path, str::FromStr},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda(usize),
}

impl FromStr for Device {
    type Err = InferError;

    /// `cpu`, `cuda` or `cuda:<ordinal>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cpu" => Ok(Device::Cpu),
            "cuda" => Ok(Device::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|ordinal| ordinal.parse().ok())
                .map(Device::Cuda)
                .ok_or_else(|| InferError::Runtime(format!("unknown device '{}'", other))),
        }
    }
}

#[derive(Debug)]
pub struct Inference {
    device: Device,
}

impl Inference {
    pub fn cpu() -> Self {
        log::info!("Inference device: CPU");
        Self {
            device: Device::Cpu,
        }
    }

    #[cfg(feature = "cuda")]
    pub fn cuda(ordinal: usize) -> Self {
        log::info!("Inference device: CUDA (ordinal {})", ordinal);
        Self {
            device: Device::Cuda(ordinal),
        }
    }

    pub fn new(device: Device) -> Result<Self, InferError> {
        match device {
            Device::Cpu => Ok(Self::cpu()),
            #[cfg(feature = "cuda")]
            Device::Cuda(ordinal) => Ok(Self::cuda(ordinal)),
            #[cfg(not(feature = "cuda"))]
            Device::Cuda(_) => Err(InferError::Runtime("CUDA feature not enabled".to_string())),
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn onnx_session(&self, model_path: impl AsRef<Path>) -> Result<OnnxModel, InferError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(InferError::Io(format!(
                "model file not found: {}",
                path.display()
            )));
        }
        let builder = Session::builder()?;
        let session = match self.device {
            Device::Cpu => builder.commit_from_file(path)?,
            #[cfg(feature = "cuda")]
            Device::Cuda(ordinal) => {
                use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
                let ep = CUDAExecutionProvider::default().with_device_id(ordinal as i32);
                if !ep.is_available().unwrap_or(false) {
                    log::warn!("CUDA execution provider not available, falling back to CPU");
                }
                builder
                    .with_execution_providers([ep.build()])?
                    .commit_from_file(path)?
            }
            #[cfg(not(feature = "cuda"))]
            Device::Cuda(_) => {
                return Err(InferError::Runtime("CUDA feature not enabled".to_string()));
            }
        };
        log::info!("loaded ONNX model {}", path.display());
        Ok(OnnxModel::new(session))
    }

    pub fn use_person_detector(
        &self,
        model_path: impl AsRef<Path>,
    ) -> Result<YoloDetector, InferError> {
        Ok(YoloDetector::new(self.onnx_session(model_path)?))
    }

    pub fn use_pose_estimator(
        &self,
        model_path: impl AsRef<Path>,
    ) -> Result<OnnxPoseEstimator, InferError> {
        Ok(OnnxPoseEstimator::new(self.onnx_session(model_path)?))
    }
}
