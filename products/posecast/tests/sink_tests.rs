use {
    com::{Publisher, Subscriber},
    posecast::*,
    std::io::{BufRead, BufReader},
    tokio::time::{Duration, Instant, sleep, timeout},
};

#[test]
fn test_result_writer_appends_json_lines() {
    let path = std::env::temp_dir().join(format!("posecast_{}_results.jsonl", std::process::id()));
    std::fs::remove_file(&path).ok();

    let person = PersonResult {
        keypoints: vec![[1.0, 2.0], [3.0, 4.0]],
        keypoint_scores: vec![0.5, 0.75],
        proposal_score: 2.0,
        track_id: 3,
        bbox: [10.0, 20.0, 30.0, 40.0],
    };
    {
        let mut writer = ResultWriter::create(&path).unwrap();
        writer.write(&PoseResult::empty("a.jpg")).unwrap();
        writer
            .write(&PoseResult {
                image_name: "b.jpg".to_string(),
                result: vec![person],
            })
            .unwrap();
    }

    let lines: Vec<serde_json::Value> = BufReader::new(std::fs::File::open(&path).unwrap())
        .lines()
        .map(|line| serde_json::from_str(&line.unwrap()).unwrap())
        .collect();
    std::fs::remove_file(&path).ok();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], serde_json::json!({ "image_name": "a.jpg", "result": [] }));
    assert_eq!(lines[1]["image_name"], "b.jpg");
    assert_eq!(lines[1]["result"][0]["keypoints"], serde_json::json!([[1.0, 2.0], [3.0, 4.0]]));
    assert_eq!(lines[1]["result"][0]["keypoint_scores"], serde_json::json!([0.5, 0.75]));
    assert_eq!(lines[1]["result"][0]["track_id"], 3);
    assert_eq!(lines[1]["result"][0]["bbox"], serde_json::json!([10.0, 20.0, 30.0, 40.0]));
}

#[tokio::test]
async fn test_publisher_sink_delivers_flat_array() {
    let mut publisher = Publisher::<Vec<f32>>::bind("127.0.0.1:0").await.unwrap();
    let mut subscriber = Subscriber::<Vec<f32>>::connect(publisher.local_addr())
        .await
        .unwrap();
    let deadline = Instant::now() + Duration::from_secs(5);
    while publisher.client_count().await == 0 {
        assert!(Instant::now() < deadline, "subscriber did not connect");
        sleep(Duration::from_millis(10)).await;
    }

    let points: Vec<f32> = (0..12).map(|i| i as f32 * 0.1).collect();
    ResultSink::publish(&mut publisher, &points);

    let received = timeout(Duration::from_secs(5), subscriber.recv())
        .await
        .expect("recv timed out")
        .unwrap();
    assert_eq!(received, points);
}
