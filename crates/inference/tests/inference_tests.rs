use inference::{CocoJoint, Device, InferError, Inference};

#[test]
fn test_device_names() {
    assert_eq!("cpu".parse::<Device>().unwrap(), Device::Cpu);
    assert_eq!("cuda".parse::<Device>().unwrap(), Device::Cuda(0));
    assert_eq!("cuda:2".parse::<Device>().unwrap(), Device::Cuda(2));
    assert!("tpu".parse::<Device>().is_err());
    assert!("cuda:x".parse::<Device>().is_err());
}

#[test]
fn test_onnx_session_nonexistent_file() {
    let inference = Inference::cpu();
    match inference.onnx_session("nonexistent.onnx") {
        Err(InferError::Io(msg)) => assert!(msg.contains("not found")),
        Err(other) => panic!("expected InferError::Io, got {other}"),
        Ok(_) => panic!("expected an error"),
    }
    assert!(inference.use_person_detector("nonexistent.onnx").is_err());
    assert!(inference.use_pose_estimator("nonexistent.onnx").is_err());
}

#[test]
fn test_infer_error_display() {
    let err = InferError::Shape("invalid dimensions".to_string());
    assert!(err.to_string().contains("invalid dimensions"));
    let err = InferError::UnsupportedJoints(42);
    assert!(err.to_string().contains("42"));
    let err: InferError = base::TensorError::ShapeOverflow.into();
    assert!(matches!(err, InferError::Shape(_)));
}

#[test]
fn test_coco_joint_indices() {
    assert_eq!(CocoJoint::LeftElbow as usize, 7);
    assert_eq!(CocoJoint::RightElbow as usize, 8);
    assert_eq!(usize::from(CocoJoint::LeftWrist), 9);
    assert_eq!(usize::from(CocoJoint::RightWrist), 10);
}
