use crate::PoseError;
use kine_base::Tensor;
use kine_video::Frame;

/// The network forward pass, as seen by the inference worker.
///
/// `infer` runs synchronously on the worker thread and may take as long as
/// the hardware needs; it is never called while a pipeline lock is held.
pub trait InferenceEngine: Send {
    /// False when the engine failed to initialize and cannot produce output.
    fn is_ready(&self) -> bool {
        true
    }

    /// Human-readable reason for `is_ready() == false`.
    fn unavailable_reason(&self) -> Option<String> {
        None
    }

    /// Run the detector on a frame and return detections shaped `[N, 56]`.
    fn infer(&mut self, frame: &Frame) -> Result<Tensor<f32>, PoseError>;
}

impl<E: InferenceEngine + ?Sized> InferenceEngine for Box<E> {
    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn unavailable_reason(&self) -> Option<String> {
        (**self).unavailable_reason()
    }

    fn infer(&mut self, frame: &Frame) -> Result<Tensor<f32>, PoseError> {
        (**self).infer(frame)
    }
}
