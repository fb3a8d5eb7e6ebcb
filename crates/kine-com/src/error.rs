use std::fmt;

#[derive(Debug)]
pub enum ComError {
    Io(std::io::Error),
    Encode(rosc::OscError),
}

impl fmt::Display for ComError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComError::Io(err) => write!(f, "io error: {err}"),
            ComError::Encode(err) => write!(f, "osc encode error: {err}"),
        }
    }
}

impl std::error::Error for ComError {}

impl From<std::io::Error> for ComError {
    fn from(err: std::io::Error) -> Self {
        ComError::Io(err)
    }
}

impl From<rosc::OscError> for ComError {
    fn from(err: rosc::OscError) -> Self {
        ComError::Encode(err)
    }
}
