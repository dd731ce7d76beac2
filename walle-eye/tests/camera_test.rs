//! Tests for frame sampling over replayed camera devices

use walle_eye::{
    detect, CameraDevice, Frame, FrameSampler, ObjectClass, Pixel, Region, ReplayCamera,
    VisionError,
};

const TRASH: Pixel = Pixel::new(100, 50, 10);
const FLOOR: Pixel = Pixel::new(130, 130, 130);

#[tokio::test]
async fn test_sampler_returns_fresh_frame_per_capture() {
    let camera = ReplayCamera::new(
        "top_image_sensor",
        vec![Frame::filled(4, 4, FLOOR), Frame::filled(4, 4, TRASH)],
    );
    let mut sampler = FrameSampler::new(Box::new(camera));

    let first = sampler.capture().await.unwrap();
    let second = sampler.capture().await.unwrap();

    let region = Region::full(&first);
    assert_eq!(detect(&first, region, ObjectClass::Trash).match_count, 0);
    assert_eq!(detect(&second, region, ObjectClass::Trash).match_count, 16);
    assert_eq!(sampler.device_name(), "top_image_sensor");
}

#[tokio::test]
async fn test_frames_pushed_after_handoff() {
    let camera = ReplayCamera::new("small_image_sensor", Vec::new());
    let handle = camera.handle();
    let mut sampler = FrameSampler::new(Box::new(camera));

    assert!(matches!(
        sampler.capture().await,
        Err(VisionError::SensorUnavailable(_))
    ));

    handle.push(Frame::filled(2, 3, TRASH));
    let frame = sampler.capture().await.unwrap();
    assert_eq!((frame.width(), frame.height()), (2, 3));
    assert_eq!(handle.queued(), 0);
}

#[tokio::test]
async fn test_disconnect_mid_run() {
    let camera = ReplayCamera::new("top_image_sensor", vec![Frame::filled(2, 2, FLOOR)]).looping();
    let handle = camera.handle();
    let mut sampler = FrameSampler::new(Box::new(camera));

    assert!(sampler.capture().await.is_ok());
    handle.disconnect();
    match sampler.capture().await {
        Err(VisionError::SensorUnavailable(name)) => assert_eq!(name, "top_image_sensor"),
        other => panic!("Expected SensorUnavailable, got {:?}", other.is_ok()),
    }
    handle.reconnect();
    assert!(sampler.capture().await.is_ok());
}

#[tokio::test]
async fn test_replay_from_image_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pad.png");
    image::RgbImage::from_pixel(6, 4, image::Rgb([220, 220, 40]))
        .save(&path)
        .unwrap();

    let mut camera = ReplayCamera::from_paths("top_image_sensor", &[&path]).unwrap();
    camera.refresh().await.unwrap();
    let frame = camera.current_frame().unwrap();

    let result = detect(&frame, Region::bottom_rows(&frame, 2), ObjectClass::ChargingArea);
    assert_eq!(result.coverage, 1.0);
    assert_eq!(Frame::open(&path).unwrap(), frame);
}
