//! Shared types for the signwave pipeline.
//!
//! `Frame` is the unit of data handed from the camera layer to the
//! inference layer. The logging module provides the stdout logger used
//! by demos and tests.

pub mod frame;
pub mod logging;

pub use frame::{Frame, FrameError};
pub use logging::{StdoutLogger, init_stdout_logger};

// Re-export log so downstream crates can use sign_base::log::*
pub use log;
