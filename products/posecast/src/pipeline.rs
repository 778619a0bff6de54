use {
    crate::{Config, PersonResult, PipelineError, PoseResult, Profiler, Stage},
    base::Tensor,
    image::Image,
    inference::{
        CropNormalizer, CroppedInput, DecoderKind, Detection, HeatmapDecoder, InferError,
        Inference, MultiPersonMerger, PERSON_CLASS, PersonDetector, PoseEstimate, PoseEstimator,
        estimate_heatmaps,
    },
    std::time::{Duration, Instant},
};

/// Single-image pose pipeline: detect, crop, estimate, decode, merge.
pub struct Pipeline {
    detector: Box<dyn PersonDetector>,
    estimator: Box<dyn PoseEstimator>,
    normalizer: CropNormalizer,
    decoder: HeatmapDecoder,
    merger: MultiPersonMerger,
    flip_pairs: Option<Vec<(usize, usize)>>,
    profiler: Option<Profiler>,
}

impl Pipeline {
    pub fn new(
        detector: Box<dyn PersonDetector>,
        estimator: Box<dyn PoseEstimator>,
        config: &Config,
    ) -> Result<Self, InferError> {
        let num_joints = config.preset.num_joints();
        let kind = DecoderKind::resolve(config.loss, config.norm_type, num_joints)?;
        let decoder = HeatmapDecoder::new(kind, num_joints);
        let merger = MultiPersonMerger::new(config.min_box_area, decoder.uses_heatmap_scores());
        log::info!(
            "pose pipeline: {:?}, {} joints, decoder {:?}, flip {}",
            config.preset,
            num_joints,
            kind,
            config.flip
        );
        Ok(Self {
            detector,
            estimator,
            normalizer: CropNormalizer::new(config.preset.input_size()),
            decoder,
            merger,
            flip_pairs: config.flip.then(|| config.preset.flip_pairs()),
            profiler: config.profile.then(Profiler::new),
        })
    }

    /// Load both ONNX models named in `config`.
    pub fn load(config: &Config, inference: &Inference) -> Result<Self, InferError> {
        let detector = inference
            .use_person_detector(&config.detector_model)?
            .with_conf_threshold(config.conf_threshold)
            .with_nms_threshold(config.nms_threshold);
        let estimator = inference.use_pose_estimator(&config.pose_model)?;
        Self::new(Box::new(detector), Box::new(estimator), config)
    }

    pub fn decoder(&self) -> &HeatmapDecoder {
        &self.decoder
    }

    pub fn profiler(&self) -> Option<&Profiler> {
        self.profiler.as_ref()
    }

    pub fn process(&mut self, image_name: &str, image: &Image) -> Result<PoseResult, PipelineError> {
        let started = Instant::now();

        let detections = self.detect(image).map_err(PipelineError::at(Stage::Detecting))?;
        if detections.is_empty() {
            log::debug!("{}: no person detected", image_name);
            self.record_detection_only(started);
            return Ok(PoseResult::empty(image_name));
        }

        let crops = self
            .crop(image, &detections)
            .map_err(PipelineError::at(Stage::PoseEstimating))?;
        if crops.is_empty() {
            log::debug!("{}: no usable person box", image_name);
            self.record_detection_only(started);
            return Ok(PoseResult::empty(image_name));
        }
        let detected = Instant::now();

        let heatmaps = self
            .estimate(&crops)
            .map_err(PipelineError::at(Stage::PoseEstimating))?;
        let estimated = Instant::now();

        let poses = self
            .decode(&heatmaps, &crops)
            .map_err(PipelineError::at(Stage::Decoding))?;
        let merged = self.merger.merge(&poses);
        let result = PoseResult {
            image_name: image_name.to_string(),
            result: merged.iter().map(PersonResult::from).collect(),
        };

        if let Some(profiler) = &mut self.profiler {
            profiler.record(
                detected - started,
                estimated - detected,
                estimated.elapsed(),
            );
        }
        Ok(result)
    }

    // frames without a person still count, with zero pose and post time
    fn record_detection_only(&mut self, started: Instant) {
        if let Some(profiler) = &mut self.profiler {
            profiler.record(started.elapsed(), Duration::ZERO, Duration::ZERO);
        }
    }

    // person boxes only
    fn detect(&mut self, image: &Image) -> Result<Vec<Detection>, InferError> {
        Ok(self
            .detector
            .detect(image)?
            .into_iter()
            .filter(|d| d.class_id == PERSON_CLASS && d.bbox.area() >= 0.0)
            .collect())
    }

    fn crop(
        &self,
        image: &Image,
        detections: &[Detection],
    ) -> Result<Vec<(Detection, CroppedInput)>, InferError> {
        let mut crops = Vec::with_capacity(detections.len());
        for detection in detections {
            if let Some(crop) = self.normalizer.crop(image, &detection.bbox)? {
                crops.push((*detection, crop));
            }
        }
        Ok(crops)
    }

    fn estimate(&mut self, crops: &[(Detection, CroppedInput)]) -> Result<Tensor<f32>, InferError> {
        let inputs: Vec<Tensor<f32>> = crops.iter().map(|(_, c)| c.tensor.clone()).collect();
        let batch = Tensor::stack(&inputs)?;
        let heatmaps =
            estimate_heatmaps(self.estimator.as_mut(), &batch, self.flip_pairs.as_deref())?;
        let num_joints = self.decoder.num_joints();
        if heatmaps.ndim() != 4 || heatmaps.shape[0] != crops.len() || heatmaps.shape[1] != num_joints {
            return Err(InferError::Shape(format!(
                "expected [{}, {}, H, W] heatmaps, got {:?}",
                crops.len(),
                num_joints,
                heatmaps.shape
            )));
        }
        Ok(heatmaps)
    }

    fn decode(
        &self,
        heatmaps: &Tensor<f32>,
        crops: &[(Detection, CroppedInput)],
    ) -> Result<Vec<PoseEstimate>, InferError> {
        let heatmap_size = base::Vec2::new(heatmaps.shape[3], heatmaps.shape[2]);
        crops
            .iter()
            .enumerate()
            .map(|(i, (detection, crop))| {
                let decoded = self
                    .decoder
                    .decode(heatmaps.outer(i), heatmap_size, &crop.transform)?;
                Ok(PoseEstimate {
                    keypoints: decoded.keypoints,
                    scores: decoded.scores,
                    bbox: detection.bbox,
                    box_score: detection.score,
                    track_id: i,
                })
            })
            .collect()
    }
}
