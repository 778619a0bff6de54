use {
    base::Tensor,
    inference::{InferError, PoseEstimator, estimate_heatmaps, flip_heatmap, flip_width},
};

#[test]
fn test_flip_width_mirrors_rows() {
    let t = Tensor::new(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(flip_width(&t).data, vec![3.0, 2.0, 1.0, 6.0, 5.0, 4.0]);
}

#[test]
fn test_flip_heatmap_swaps_pairs_and_shifts() {
    // [1, 3, 1, 4]: joints 1 and 2 are a left/right pair
    let data = vec![
        1.0, 2.0, 3.0, 4.0, //
        10.0, 20.0, 30.0, 40.0, //
        100.0, 200.0, 300.0, 400.0,
    ];
    let hm = Tensor::new(vec![1, 3, 1, 4], data).unwrap();

    let out = flip_heatmap(&hm, &[(1, 2)], false).unwrap();
    assert_eq!(
        out.data,
        vec![4.0, 3.0, 2.0, 1.0, 400.0, 300.0, 200.0, 100.0, 40.0, 30.0, 20.0, 10.0]
    );

    let out = flip_heatmap(&hm, &[(1, 2)], true).unwrap();
    assert_eq!(&out.data[..4], &[4.0, 4.0, 3.0, 2.0]);
}

#[test]
fn test_flip_heatmap_rejects_bad_pairs() {
    let hm = Tensor::new(vec![1, 2, 1, 1], vec![0.0, 0.0]).unwrap();
    assert!(matches!(
        flip_heatmap(&hm, &[(0, 5)], false),
        Err(InferError::Shape(_))
    ));
}

// each crop's single heatmap row is the crop's first channel row
struct Passthrough {
    batches: Vec<usize>,
}

impl PoseEstimator for Passthrough {
    fn infer(&mut self, batch: &Tensor<f32>) -> Result<Tensor<f32>, InferError> {
        let (n, w) = (batch.shape[0], batch.shape[3]);
        self.batches.push(n);
        let mut data = Vec::new();
        for i in 0..n {
            data.extend_from_slice(&batch.outer(i)[..w]);
        }
        Ok(Tensor::new(vec![n, 1, 1, w], data)?)
    }
}

#[test]
fn test_flip_test_runs_one_doubled_batch() {
    let batch = Tensor::new(vec![1, 3, 1, 3], (0..9).map(|v| v as f32).collect()).unwrap();
    let mut estimator = Passthrough {
        batches: Vec::new(),
    };

    let plain = estimate_heatmaps(&mut estimator, &batch, None).unwrap();
    assert_eq!(plain.data, vec![0.0, 1.0, 2.0]);

    let flipped = estimate_heatmaps(&mut estimator, &batch, Some(&[][..])).unwrap();
    assert_eq!(estimator.batches, vec![1, 2]);
    assert_eq!(flipped.shape, vec![1, 1, 1, 3]);
    // mirrored pass un-mirrors to [0, 1, 2] then shifts to [0, 0, 1]
    assert_eq!(flipped.data, vec![0.0, 0.5, 1.5]);
}
