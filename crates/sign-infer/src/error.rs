use std::fmt;

#[derive(Debug)]
pub enum InferError {
    /// A model could not be loaded.
    ModelLoad(String),
    /// A tensor had an unexpected shape.
    ShapeMismatch { expected: String, got: String },
    /// The inference backend failed at runtime.
    BackendError(String),
    /// The remote interpretation endpoint failed (network, timeout, non-200).
    Http(String),
    /// A frame could not be encoded for the wire.
    Encode(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            InferError::BackendError(msg) => write!(f, "backend error: {msg}"),
            InferError::Http(msg) => write!(f, "interpretation endpoint error: {msg}"),
            InferError::Encode(msg) => write!(f, "frame encode error: {msg}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::ModelLoad(err.to_string())
    }
}

impl From<ureq::Error> for InferError {
    fn from(err: ureq::Error) -> Self {
        InferError::Http(err.to_string())
    }
}

impl From<image::ImageError> for InferError {
    fn from(err: image::ImageError) -> Self {
        InferError::Encode(err.to_string())
    }
}
