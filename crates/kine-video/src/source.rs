use crate::{Frame, VideoError};
use kine_base::Vec2;

/// Blocking producer of RGB frames.
///
/// Implementations are driven from the capture context; `capture` may block
/// until the device has a new frame ready.
pub trait FrameSource: Send {
    /// Frame size negotiated with the device.
    fn size(&self) -> Vec2<usize>;

    /// Block until the next frame is available.
    fn capture(&mut self) -> Result<Frame, VideoError>;
}
