use {
    crate::{InferError, flip_heatmap, flip_width, average, onnx::OnnxModel},
    base::Tensor,
};

/// Maps a [N, 3, H, W] batch of crops to [N, J, Hh, Wh] heatmaps.
pub trait PoseEstimator: Send {
    fn infer(&mut self, batch: &Tensor<f32>) -> Result<Tensor<f32>, InferError>;
}

pub struct OnnxPoseEstimator {
    model: OnnxModel,
}

impl OnnxPoseEstimator {
    pub fn new(model: OnnxModel) -> Self {
        Self { model }
    }
}

impl PoseEstimator for OnnxPoseEstimator {
    fn infer(&mut self, batch: &Tensor<f32>) -> Result<Tensor<f32>, InferError> {
        let output = self.model.run(batch.clone())?;
        if output.ndim() != 4 || output.shape[0] != batch.shape[0] {
            return Err(InferError::Shape(format!(
                "expected [{}, J, H, W] heatmaps, got {:?}",
                batch.shape[0], output.shape
            )));
        }
        Ok(output)
    }
}

/// Run the estimator, and with `flip_pairs` also on the mirrored batch
/// (in the same call), averaging both passes after un-mirroring.
pub fn estimate_heatmaps(
    estimator: &mut dyn PoseEstimator,
    batch: &Tensor<f32>,
    flip_pairs: Option<&[(usize, usize)]>,
) -> Result<Tensor<f32>, InferError> {
    if batch.ndim() != 4 {
        return Err(InferError::Shape(format!(
            "expected [N, 3, H, W] batch, got {:?}",
            batch.shape
        )));
    }
    let Some(pairs) = flip_pairs else {
        return estimator.infer(batch);
    };

    let n = batch.shape[0];
    let both = Tensor::stack(&[batch.clone(), flip_width(batch)])?;
    let mut shape = batch.shape.clone();
    shape[0] = 2 * n;
    let both = Tensor::new(shape, both.data)?;

    let heatmaps = estimator.infer(&both)?;
    if heatmaps.ndim() != 4 || heatmaps.shape[0] != 2 * n {
        return Err(InferError::Shape(format!(
            "expected [{}, J, H, W] heatmaps, got {:?}",
            2 * n,
            heatmaps.shape
        )));
    }
    let half = heatmaps.len() / 2;
    let mut shape = heatmaps.shape.clone();
    shape[0] = n;
    let plain = Tensor::new(shape.clone(), heatmaps.data[..half].to_vec())?;
    let mirrored = Tensor::new(shape, heatmaps.data[half..].to_vec())?;
    average(&plain, &flip_heatmap(&mirrored, pairs, true)?)
}
