use crate::keypoint::{Keypoint, PoseEstimate, COCO_KEYPOINT_COUNT};
use crate::PoseError;
use kine_base::{Tensor, Vec2};

/// Columns per candidate row: cx, cy, w, h, confidence, then 17 x (x, y, conf).
pub const DETECTION_CHANNELS: usize = 5 + COCO_KEYPOINT_COUNT * 3;

const CONFIDENCE_COLUMN: usize = 4;
const KEYPOINT_COLUMN: usize = 5;

/// Decoding parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecoderConfig {
    model_input: Vec2<usize>,
    detection_threshold: f32,
    keypoint_threshold: f32,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            model_input: Vec2::new(320, 320),
            detection_threshold: 0.5,
            keypoint_threshold: 0.5,
        }
    }
}

impl DecoderConfig {
    /// Resolution the network was fed, i.e. the coordinate space of the tensor.
    pub fn with_model_input(mut self, width: usize, height: usize) -> Self {
        self.model_input = Vec2::new(width, height);
        self
    }

    /// A subject is reported only when its confidence is strictly above this.
    pub fn with_detection_threshold(mut self, threshold: f32) -> Self {
        self.detection_threshold = threshold;
        self
    }

    /// A keypoint is reported only when its confidence is strictly above this.
    pub fn with_keypoint_threshold(mut self, threshold: f32) -> Self {
        self.keypoint_threshold = threshold;
        self
    }

    pub fn model_input(&self) -> Vec2<usize> {
        self.model_input
    }

    pub fn detection_threshold(&self) -> f32 {
        self.detection_threshold
    }

    pub fn keypoint_threshold(&self) -> f32 {
        self.keypoint_threshold
    }
}

/// Decode the single best subject of a `[N, 56]` detection tensor.
///
/// Picks the row with the highest overall confidence (first one on ties), and
/// maps its keypoints from model space into `frame_size` pixels by plain
/// linear scaling. Returns the empty pose when the best confidence does not
/// pass the detection threshold, and also for any tensor that does not have
/// the `[N, 56]` layout.
pub fn decode(detections: &Tensor<f32>, frame_size: Vec2<usize>, config: &DecoderConfig) -> PoseEstimate {
    let Some((rows, cols)) = detections.dims2() else {
        log::debug!("decode: expected [N, {DETECTION_CHANNELS}], got {:?}", detections.shape);
        return PoseEstimate::empty();
    };
    if cols != DETECTION_CHANNELS || rows.checked_mul(cols) != Some(detections.data.len()) {
        log::debug!("decode: expected [N, {DETECTION_CHANNELS}], got {:?}", detections.shape);
        return PoseEstimate::empty();
    }
    if config.model_input.x == 0 || config.model_input.y == 0 {
        return PoseEstimate::empty();
    }

    let Some((best, confidence)) = best_candidate(detections) else {
        return PoseEstimate::empty();
    };
    if confidence <= config.detection_threshold {
        return PoseEstimate::empty();
    }
    let Some(row) = detections.row(best) else {
        return PoseEstimate::empty();
    };

    let frame_w = frame_size.x as f32;
    let frame_h = frame_size.y as f32;
    let model_w = config.model_input.x as f32;
    let model_h = config.model_input.y as f32;

    let mut keypoints: [Keypoint; COCO_KEYPOINT_COUNT] = [None; COCO_KEYPOINT_COUNT];
    for (k, keypoint) in keypoints.iter_mut().enumerate() {
        let base = KEYPOINT_COLUMN + k * 3;
        let (x, y, point_confidence) = (row[base], row[base + 1], row[base + 2]);
        if point_confidence > config.keypoint_threshold {
            *keypoint = Some(Vec2::new(x * frame_w / model_w, y * frame_h / model_h));
        }
    }

    PoseEstimate::from_keypoints(keypoints)
}

/// Row index and confidence of the most confident candidate.
///
/// NaN confidences never win; ties keep the earliest row.
fn best_candidate(detections: &Tensor<f32>) -> Option<(usize, f32)> {
    let (rows, _) = detections.dims2()?;
    let mut best: Option<(usize, f32)> = None;
    for index in 0..rows {
        let confidence = detections.at2(index, CONFIDENCE_COLUMN)?;
        let better = match best {
            Some((_, current)) => confidence > current,
            None => !confidence.is_nan(),
        };
        if better {
            best = Some((index, confidence));
        }
    }
    best
}

/// Bring raw network output into the `[N, 56]` layout [`decode`] reads.
///
/// YOLO pose models emit `[1, 56, N]` (or `[56, N]` once the batch axis is
/// dropped); both are transposed. Row-major `[1, N, 56]` and `[N, 56]` only
/// lose the batch axis. A tensor is ambiguous only when `N == 56` and is
/// treated as channel-major there.
pub fn detections_from_raw(raw: &Tensor<f32>) -> Result<Tensor<f32>, PoseError> {
    let channel_major = match raw.shape.as_slice() {
        &[1, channels, n] | &[channels, n] if channels == DETECTION_CHANNELS => {
            Tensor::new(vec![channels, n], raw.data.clone())?
        }
        &[_, cols] if cols == DETECTION_CHANNELS => return Ok(raw.clone()),
        &[1, n, cols] if cols == DETECTION_CHANNELS => {
            return Ok(Tensor::new(vec![n, cols], raw.data.clone())?);
        }
        shape => {
            return Err(PoseError::MalformedTensor(format!(
                "expected [1, {DETECTION_CHANNELS}, N], got {shape:?}"
            )));
        }
    };
    channel_major
        .transposed()
        .ok_or_else(|| PoseError::MalformedTensor("transpose failed".to_string()))
}
