//! Pose delivery to downstream consumers over OSC/UDP.

pub mod error;
pub mod osc;

pub use error::ComError;
pub use osc::{
    encode_message, pose_message, start_message, PoseSender, PoseSenderConfig, DEFAULT_TARGET,
    POSES_ADDR, START_ADDR,
};
