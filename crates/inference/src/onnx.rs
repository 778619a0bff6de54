use {
    crate::InferError,
    base::Tensor,
    ndarray::{ArrayD, ArrayViewD},
    ort::{inputs, session::Session, value::TensorRef},
};

/// Single-input, single-output ONNX model.
pub struct OnnxModel {
    session: Session,
}

impl OnnxModel {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Run the model on one f32 tensor and return its first output.
    pub fn run(&mut self, input: Tensor<f32>) -> Result<Tensor<f32>, InferError> {
        let array = tensor_to_ndarray(input)?;
        let tensor_ref = TensorRef::from_array_view(array.view())?;
        let outputs = self.session.run(inputs![tensor_ref])?;
        let array = outputs[0].try_extract_array::<f32>()?;
        ndarray_to_tensor(array)
    }
}

pub fn tensor_to_ndarray(tensor: Tensor<f32>) -> Result<ArrayD<f32>, InferError> {
    Ok(ArrayD::from_shape_vec(tensor.shape, tensor.data)?)
}

pub fn ndarray_to_tensor(array: ArrayViewD<'_, f32>) -> Result<Tensor<f32>, InferError> {
    let shape = array.shape().to_vec();
    let data = array.iter().copied().collect();
    Ok(Tensor::new(shape, data)?)
}
