use std::fmt;

#[derive(Debug)]
pub enum CameraError {
    /// The device could not be opened or configured. Permanent.
    Device(String),
    /// The capture stream failed while running.
    Stream(String),
    /// A captured buffer could not be decoded to RGB.
    Decode(String),
    /// The capture thread channel was lost.
    Channel(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Device(msg) => write!(f, "camera device error: {msg}"),
            CameraError::Stream(msg) => write!(f, "camera stream error: {msg}"),
            CameraError::Decode(msg) => write!(f, "frame decode error: {msg}"),
            CameraError::Channel(msg) => write!(f, "capture channel error: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::Device(err.to_string())
    }
}

impl From<sign_base::FrameError> for CameraError {
    fn from(err: sign_base::FrameError) -> Self {
        CameraError::Decode(err.to_string())
    }
}
