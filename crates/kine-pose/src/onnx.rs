use crate::{detections_from_raw, InferenceEngine, PoseError};
use kine_base::{Tensor, Vec2};
use kine_video::{Frame, CHANNELS};
use ndarray::{ArrayViewD, IxDyn};
use ort::{inputs, session::Session, value::TensorRef};
use std::{fmt, path::Path};

/// Execution target for the ONNX session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Cpu,
    Cuda { device_id: i32 },
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "CPU"),
            Device::Cuda { device_id } => write!(f, "CUDA(device_id={device_id})"),
        }
    }
}

impl Device {
    /// The first CUDA device when the build supports it and one is present, else CPU.
    pub fn preferred() -> Self {
        #[cfg(feature = "cuda")]
        {
            use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
            if CUDAExecutionProvider::default().is_available().unwrap_or(false) {
                return Device::Cuda { device_id: 0 };
            }
        }
        Device::Cpu
    }
}

struct LoadedModel {
    session: Session,
    input_name: String,
    output_name: String,
}

/// YOLO pose network executed with ONNX Runtime.
///
/// Frames are stretched (not letterboxed) to the model input, so decoded
/// keypoints map back with a plain per-axis scale.
pub struct OnnxEngine {
    model: Result<LoadedModel, String>,
    input_size: Vec2<usize>,
    input: Vec<f32>,
}

impl OnnxEngine {
    /// Load a model, failing if the session cannot be created.
    pub fn load(
        model_path: impl AsRef<Path>,
        device: Device,
        input_size: Vec2<usize>,
    ) -> Result<Self, PoseError> {
        let model = load_model(model_path.as_ref(), device).map_err(PoseError::EngineUnavailable)?;
        Ok(Self {
            model: Ok(model),
            input_size,
            input: Vec::new(),
        })
    }

    /// Load a model, keeping a failure as "not ready" instead of an error.
    ///
    /// The pipeline then keeps draining frames without producing poses and
    /// reports the reason once when the worker starts.
    pub fn load_or_unavailable(
        model_path: impl AsRef<Path>,
        device: Device,
        input_size: Vec2<usize>,
    ) -> Self {
        Self {
            model: load_model(model_path.as_ref(), device),
            input_size,
            input: Vec::new(),
        }
    }

    pub fn input_size(&self) -> Vec2<usize> {
        self.input_size
    }
}

fn load_model(path: &Path, device: Device) -> Result<LoadedModel, String> {
    let mut builder =
        Session::builder().map_err(|e| format!("failed to create session builder: {e}"))?;

    builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(device_id)
                    .build()])
                .map_err(|e| format!("CUDA execution provider rejected: {e}"))?
        }
        #[cfg(not(feature = "cuda"))]
        Device::Cuda { .. } => return Err("CUDA support not compiled in".to_string()),
    };

    let session = builder
        .commit_from_file(path)
        .map_err(|e| format!("failed to load {}: {e}", path.display()))?;

    let input_name = session
        .inputs()
        .first()
        .map(|input| input.name().to_string())
        .ok_or_else(|| "model has no inputs".to_string())?;
    let output_name = session
        .outputs()
        .first()
        .map(|output| output.name().to_string())
        .ok_or_else(|| "model has no outputs".to_string())?;

    log::info!("pose model {} loaded on {}", path.display(), device);
    Ok(LoadedModel {
        session,
        input_name,
        output_name,
    })
}

/// Stretch an RGB frame to `size`, scale to [0, 1], and lay it out as NCHW.
///
/// Nearest-neighbour sampling; `out` is resized to `3 * size.x * size.y`.
pub fn preprocess(frame: &Frame, size: Vec2<usize>, out: &mut Vec<f32>) {
    let plane = size.area();
    out.clear();
    out.resize(CHANNELS * plane, 0.0);
    if !frame.is_valid() || plane == 0 {
        return;
    }

    let (src_w, src_h) = (frame.width(), frame.height());
    let pixels = frame.pixels();
    for y in 0..size.y {
        let src_y = (y * src_h / size.y).min(src_h - 1);
        for x in 0..size.x {
            let src_x = (x * src_w / size.x).min(src_w - 1);
            let src = (src_y * src_w + src_x) * CHANNELS;
            let dst = y * size.x + x;
            for c in 0..CHANNELS {
                out[c * plane + dst] = pixels[src + c] as f32 / 255.0;
            }
        }
    }
}

impl InferenceEngine for OnnxEngine {
    fn is_ready(&self) -> bool {
        self.model.is_ok()
    }

    fn unavailable_reason(&self) -> Option<String> {
        self.model.as_ref().err().cloned()
    }

    fn infer(&mut self, frame: &Frame) -> Result<Tensor<f32>, PoseError> {
        let model = self
            .model
            .as_mut()
            .map_err(|reason| PoseError::EngineUnavailable(reason.clone()))?;

        preprocess(frame, self.input_size, &mut self.input);

        let shape = [1, CHANNELS, self.input_size.y, self.input_size.x];
        let view = ArrayViewD::from_shape(IxDyn(&shape), &self.input)
            .map_err(|e| PoseError::Engine(format!("input shape: {e}")))?;
        let tensor_ref = TensorRef::from_array_view(view)
            .map_err(|e| PoseError::Engine(format!("failed to create tensor ref: {e}")))?;

        let outputs = model
            .session
            .run(inputs![model.input_name.as_str() => tensor_ref])
            .map_err(|e| PoseError::Engine(format!("inference failed: {e}")))?;

        let array = outputs[model.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| PoseError::MalformedTensor(format!("output is not f32: {e}")))?;
        let raw = Tensor::new(array.shape().to_vec(), array.iter().copied().collect())?;

        detections_from_raw(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_layout_and_scale() {
        // 2x1 frame: pure red, pure blue
        let frame = Frame::new(vec![255, 0, 0, 0, 0, 255], 2, 1);
        let mut out = Vec::new();
        preprocess(&frame, Vec2::new(2, 1), &mut out);
        // R plane, G plane, B plane
        assert_eq!(out, vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_preprocess_stretches() {
        let frame = Frame::new(vec![51; 4 * 2 * 3], 4, 2);
        let mut out = Vec::new();
        preprocess(&frame, Vec2::new(8, 8), &mut out);
        assert_eq!(out.len(), 3 * 64);
        assert!(out.iter().all(|&v| (v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn test_preprocess_invalid_frame_zeroes() {
        let mut out = vec![9.0; 3];
        preprocess(&Frame::empty(), Vec2::new(2, 2), &mut out);
        assert_eq!(out, vec![0.0; 12]);
    }

    #[test]
    fn test_missing_model_is_unavailable() {
        let engine =
            OnnxEngine::load_or_unavailable("does-not-exist.onnx", Device::Cpu, Vec2::new(320, 320));
        assert!(!engine.is_ready());
        assert!(engine.unavailable_reason().is_some());
    }

    #[test]
    fn test_unavailable_infer_skips_preprocessing() {
        let mut engine =
            OnnxEngine::load_or_unavailable("does-not-exist.onnx", Device::Cpu, Vec2::new(320, 320));
        let frame = Frame::new(vec![0; 640 * 480 * 3], 640, 480);

        let result = engine.infer(&frame);

        assert!(matches!(result, Err(PoseError::EngineUnavailable(_))));
        assert!(engine.input.is_empty());
    }
}
