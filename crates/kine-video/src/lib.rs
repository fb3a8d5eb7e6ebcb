//! Frame types and capture sources for the kine pipeline.
//!
//! Frames are owned RGB8 buffers. They are deliberately not `Clone`: a frame
//! moves from the capture context to the inference context without its
//! pixels ever being copied.

pub mod convert;
pub mod error;
pub mod frame;
pub mod source;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use error::VideoError;
pub use frame::{Frame, CHANNELS};
pub use source::FrameSource;

#[cfg(feature = "v4l2")]
pub use v4l2::{V4l2Camera, V4l2Config};
