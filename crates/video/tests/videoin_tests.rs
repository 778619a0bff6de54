use {
    base::Vec2,
    image::{Image, PixelFormat},
    std::time::Duration,
    tokio::time::timeout,
    video::{
        DepthImage, VideoError, VideoIn, VideoInConfig,
        videoin::still::StillConfig,
    },
};

fn test_image() -> Image {
    Image::new(Vec2::new(4, 3), vec![10; 4 * 3 * 3], PixelFormat::Rgb8)
}

#[tokio::test]
async fn test_still_open_and_capture() {
    let mut config = StillConfig::new(test_image(), 100.0);
    config.depth = Some(DepthImage::constant(Vec2::new(4, 3), 1.25));
    let mut videoin = VideoIn::open(VideoInConfig::Still(config)).await.unwrap();
    assert_eq!(videoin.size(), Vec2::new(4, 3));
    assert_eq!(videoin.frame_rate(), 100.0);

    let frame = timeout(Duration::from_secs(2), videoin.capture())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(frame.color.size, Vec2::new(4, 3));
    let depth = frame.depth.unwrap();
    assert!((depth.distance(3, 2).unwrap() - 1.25).abs() < 1e-6);
    assert_eq!(frame.intrinsics.width, 4);
}

#[tokio::test]
async fn test_end_of_stream_is_forwarded() {
    let mut config = StillConfig::new(test_image(), 200.0);
    config.max_frames = Some(2);
    let mut videoin = VideoIn::open(VideoInConfig::Still(config)).await.unwrap();

    let mut frames = 0;
    let error = loop {
        match timeout(Duration::from_secs(2), videoin.capture()).await.unwrap() {
            Ok(_) => frames += 1,
            Err(e) => break e,
        }
    };
    assert!(frames <= 2);
    assert!(matches!(error, VideoError::Stream(_)));
}

#[tokio::test]
async fn test_invalid_frame_rate_fails_open() {
    let config = StillConfig::new(test_image(), 0.0);
    let result = VideoIn::open(VideoInConfig::Still(config)).await;
    assert!(matches!(result, Err(VideoError::Device(_))));
}

#[tokio::test]
async fn test_mismatched_depth_fails_open() {
    let mut config = StillConfig::new(test_image(), 30.0);
    config.depth = Some(DepthImage::constant(Vec2::new(2, 2), 1.0));
    let result = VideoIn::open(VideoInConfig::Still(config)).await;
    assert!(matches!(result, Err(VideoError::Device(_))));
}

#[tokio::test]
async fn test_missing_image_file() {
    let result = StillConfig::from_path("/nonexistent/still.png", Some(1.0), 30.0);
    assert!(matches!(result, Err(VideoError::Decode(_))));
}

#[tokio::test]
async fn test_videoin_drop() {
    let config = StillConfig::new(test_image(), 30.0);
    let videoin = VideoIn::open(VideoInConfig::Still(config)).await.unwrap();
    drop(videoin);
}

#[test]
fn test_depth_lookup_bounds() {
    let depth = DepthImage::new(Vec2::new(2, 2), vec![0, 1000, 2000, 3000], 0.001);
    assert_eq!(depth.raw(1, 1), Some(3000));
    assert_eq!(depth.distance(0, 1), Some(2.0));
    assert_eq!(depth.raw(2, 0), None);
    assert_eq!(depth.distance(0, 2), None);
}
