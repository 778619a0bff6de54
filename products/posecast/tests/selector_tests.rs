use {base::Vec2, posecast::*};

fn person(joints: usize) -> PersonResult {
    PersonResult {
        keypoints: (0..joints).map(|j| [j as f32, 100.0 + j as f32]).collect(),
        keypoint_scores: (0..joints).map(|j| j as f32 / joints as f32).collect(),
        proposal_score: 1.0,
        track_id: 0,
        bbox: [0.0, 0.0, 10.0, 10.0],
    }
}

#[test]
fn test_select_arm_joints_in_order() {
    let selector = KeypointSelector::new(vec![7, 8, 9, 10]);
    let points = selector.select(&person(136).keypoints).unwrap();
    assert_eq!(
        points,
        vec![
            Vec2::new(7.0, 107.0),
            Vec2::new(8.0, 108.0),
            Vec2::new(9.0, 109.0),
            Vec2::new(10.0, 110.0),
        ]
    );
}

#[test]
fn test_order_follows_configuration() {
    let selector = KeypointSelector::new(vec![10, 7]);
    let points = selector.select(&person(17).keypoints).unwrap();
    assert_eq!(points, vec![Vec2::new(10.0, 110.0), Vec2::new(7.0, 107.0)]);
}

#[test]
fn test_missing_joint() {
    let selector = KeypointSelector::new(vec![7, 8, 9, 10]);
    let error = selector.select(&person(9).keypoints).unwrap_err();
    assert!(matches!(
        error,
        PipelineError::MissingJoint {
            index: 9,
            available: 9
        }
    ));
}

#[test]
fn test_visible_joints() {
    let selector = KeypointSelector::new(vec![2, 8, 15]);
    let person = person(17);
    let mut thresholds = vec![0.4; 17];
    thresholds[15] = 0.05;
    // scores are j / 17: joint 2 below 0.4, joint 8 above, joint 15 above 0.05
    let visible = selector.select_visible(&person, &thresholds);
    assert_eq!(visible, vec![Vec2::new(8.0, 108.0), Vec2::new(15.0, 115.0)]);
}

#[test]
fn test_best_person_is_first() {
    let mut second = person(17);
    second.track_id = 1;
    let result = PoseResult {
        image_name: "x.jpg".to_string(),
        result: vec![person(17), second],
    };
    assert_eq!(result.best().map(|p| p.track_id), Some(0));
    assert!(PoseResult::empty("y.jpg").best().is_none());
}
