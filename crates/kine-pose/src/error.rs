use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PoseError {
    /// Frame with a zero dimension or a buffer that does not match its size.
    InvalidFrame { width: usize, height: usize, len: usize },
    /// Inference output with an unexpected shape.
    MalformedTensor(String),
    /// The inference engine never finished initializing.
    EngineUnavailable(String),
    /// A single inference call failed.
    Engine(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseError::InvalidFrame { width, height, len } => {
                write!(f, "invalid frame: {width}x{height} with {len} bytes")
            }
            PoseError::MalformedTensor(msg) => write!(f, "malformed tensor: {msg}"),
            PoseError::EngineUnavailable(msg) => write!(f, "engine unavailable: {msg}"),
            PoseError::Engine(msg) => write!(f, "engine error: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {}

impl From<kine_base::TensorError> for PoseError {
    fn from(err: kine_base::TensorError) -> Self {
        PoseError::MalformedTensor(err.to_string())
    }
}
