//! Single-person pose tracking core.
//!
//! Frames enter through a one-slot [`FrameMailbox`], an [`InferenceWorker`]
//! thread runs them through an [`InferenceEngine`] and [`decode`], and the
//! result lands in a [`KeypointStore`] that any number of readers poll.

pub mod decoder;
pub mod engine;
pub mod error;
pub mod keypoint;
pub mod mailbox;
pub mod pipeline;
pub mod store;
pub mod worker;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use decoder::{decode, detections_from_raw, DecoderConfig, DETECTION_CHANNELS};
pub use engine::InferenceEngine;
pub use error::PoseError;
pub use keypoint::{
    Bone, Keypoint, KeypointIndex, PoseEstimate, COCO_KEYPOINT_COUNT, SKELETON, UNDETECTED,
};
pub use mailbox::{FrameMailbox, MailboxPolicy, PutOutcome};
pub use pipeline::{PipelineConfig, PosePipeline};
pub use store::KeypointStore;
pub use worker::{run_cycle, CycleOutcome, InferenceWorker, WorkerConfig, WorkerStats};

#[cfg(feature = "onnx")]
pub use onnx::{Device, OnnxEngine};
