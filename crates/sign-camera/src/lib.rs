//! Camera frame source for the signwave pipeline.
//!
//! This crate provides the `FrameSource` trait the detection loop polls
//! for frames, with a V4L2 backend behind the `v4l2` feature.

pub mod config;
pub mod error;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::CameraConfig;
pub use error::CameraError;
pub use traits::FrameSource;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;
