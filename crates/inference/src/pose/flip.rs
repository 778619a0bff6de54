use {crate::InferError, base::Tensor};

/// Mirror the last (width) axis of a tensor.
pub fn flip_width(tensor: &Tensor<f32>) -> Tensor<f32> {
    let w = tensor.shape.last().copied().unwrap_or(0);
    let mut out = tensor.clone();
    if w > 0 {
        for row in out.data.chunks_exact_mut(w) {
            row.reverse();
        }
    }
    out
}

/// Undo a mirrored pass on [N, J, H, W] heatmaps: flip the width axis,
/// swap each left/right joint pair and, with `shift`, move every column one
/// cell right to compensate for the even-width mirror.
pub fn flip_heatmap(
    heatmap: &Tensor<f32>,
    pairs: &[(usize, usize)],
    shift: bool,
) -> Result<Tensor<f32>, InferError> {
    let [n, j, h, w] = heatmap.shape[..] else {
        return Err(InferError::Shape(format!(
            "expected [N, J, H, W] heatmaps, got {:?}",
            heatmap.shape
        )));
    };
    if let Some(&(a, b)) = pairs.iter().find(|&&(a, b)| a >= j || b >= j) {
        return Err(InferError::Shape(format!(
            "flip pair ({}, {}) out of range for {} joints",
            a, b, j
        )));
    }

    let mut out = flip_width(heatmap);
    let map = h * w;
    for i in 0..n {
        let person = &mut out.data[i * j * map..(i + 1) * j * map];
        for &(a, b) in pairs {
            for k in 0..map {
                person.swap(a * map + k, b * map + k);
            }
        }
    }
    if shift && w > 1 {
        for row in out.data.chunks_exact_mut(w) {
            row.copy_within(0..w - 1, 1);
        }
    }
    Ok(out)
}

/// Element-wise mean of two equally shaped tensors.
pub fn average(a: &Tensor<f32>, b: &Tensor<f32>) -> Result<Tensor<f32>, InferError> {
    if a.shape != b.shape {
        return Err(InferError::Shape(format!(
            "cannot average {:?} with {:?}",
            a.shape, b.shape
        )));
    }
    let data = a.data.iter().zip(&b.data).map(|(x, y)| (x + y) * 0.5).collect();
    Ok(Tensor::new(a.shape.clone(), data)?)
}
