use kine_base::{Tensor, Vec2};
use kine_pose::{
    DecoderConfig, InferenceEngine, KeypointIndex, MailboxPolicy, PipelineConfig, PoseError,
    PosePipeline, WorkerConfig, COCO_KEYPOINT_COUNT, DETECTION_CHANNELS,
};
use kine_video::Frame;
use std::thread;
use std::time::{Duration, Instant};

/// Reports a subject whose every keypoint sits at the brightness of the
/// frame's first pixel, in model coordinates.
struct BrightnessEngine;

impl InferenceEngine for BrightnessEngine {
    fn infer(&mut self, frame: &Frame) -> Result<Tensor<f32>, PoseError> {
        let v = frame.pixels()[0] as f32;
        let mut row = vec![0.0, 0.0, 0.0, 0.0, 0.9];
        for _ in 0..COCO_KEYPOINT_COUNT {
            row.extend_from_slice(&[v, v, 0.9]);
        }
        Ok(Tensor::new(vec![1, DETECTION_CHANNELS], row)?)
    }
}

fn frame(value: u8) -> Frame {
    Frame::new(vec![value; 320 * 320 * 3], 320, 320)
}

fn wait_for(mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_pipeline_end_to_end() {
    let pipeline = PosePipeline::start(BrightnessEngine, PipelineConfig::default()).unwrap();
    assert!(pipeline.is_running());
    assert!(pipeline.snapshot().is_empty());

    assert!(pipeline.submit(frame(40)).is_accepted());
    let store = pipeline.store();
    wait_for(|| store.generation() >= 1);

    let pose = pipeline.snapshot();
    assert_eq!(pose.get(KeypointIndex::Nose), Some(Vec2::new(40.0, 40.0)));

    let stats = pipeline.shutdown();
    assert_eq!(stats.detected, 1);
}

#[test]
fn test_pipeline_config() {
    let config = PipelineConfig::default()
        .with_mailbox_policy(MailboxPolicy::LatestWins)
        .with_worker(
            WorkerConfig::default()
                .with_idle_interval(Duration::from_millis(2))
                .with_thread_name("pose-test")
                .with_decoder(DecoderConfig::default().with_model_input(160, 160)),
        );
    assert_eq!(config.mailbox_policy(), MailboxPolicy::LatestWins);
    assert_eq!(config.worker().idle_interval(), Duration::from_millis(2));
    assert_eq!(config.worker().thread_name(), "pose-test");

    let pipeline = PosePipeline::start(BrightnessEngine, config).unwrap();
    assert_eq!(pipeline.mailbox().policy(), MailboxPolicy::LatestWins);

    assert!(pipeline.submit(frame(40)).is_accepted());
    let store = pipeline.store();
    wait_for(|| store.generation() >= 1);
    // 40 * 320 / 160
    assert_eq!(
        pipeline.snapshot().get(KeypointIndex::LeftAnkle),
        Some(Vec2::new(80.0, 80.0))
    );
    pipeline.shutdown();
}

#[test]
fn test_store_outlives_pipeline() {
    let pipeline = PosePipeline::start(BrightnessEngine, PipelineConfig::default()).unwrap();
    let store = pipeline.store();
    let _ = pipeline.submit(frame(10));
    wait_for(|| store.generation() >= 1);
    pipeline.shutdown();

    assert_eq!(store.snapshot().detected_count(), COCO_KEYPOINT_COUNT);
}
