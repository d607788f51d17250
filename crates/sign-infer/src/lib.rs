//! Hand landmark detection, gesture classification and model lifecycle
//! for the signwave pipeline.
//!
//! The detection loop sees three seams: `LandmarkEstimator` turns a
//! frame into (possibly empty) hand landmarks, `Classifier` turns a
//! frame plus landmarks into a gesture `Detection`, and `ModelBundle`
//! owns both for the lifetime of one language session.

pub mod backend;
pub mod bundle;
pub mod classifier;
pub mod detection;
pub mod device;
pub mod error;
pub mod estimator;
pub mod landmarks;
pub mod modelsource;
pub mod preprocess;
pub mod session;
pub mod tensor;

#[cfg(feature = "onnx")]
pub mod backends;

pub use backend::Backend;
pub use bundle::{BundleConfig, BundleStatus, ClassifierConfig, ModelBundle, SignLanguage};
pub use classifier::fallback::{FallbackPolicy, friendly_guess_fallback, placeholder_fallback};
pub use classifier::local::LocalClassifier;
pub use classifier::remote::{RemoteClassifier, RemoteConfig};
pub use classifier::transport::{HttpTransport, InterpretRequest, InterpretResponse, InterpretTransport};
pub use classifier::Classifier;
pub use detection::Detection;
pub use device::Device;
pub use error::InferError;
pub use estimator::{LandmarkEstimator, SessionLandmarkEstimator};
pub use landmarks::{HAND_LANDMARK_COUNT, HandLandmarks, Landmark, LandmarkIndex};
pub use modelsource::ModelSource;
pub use session::Session;
pub use tensor::Tensor;

#[cfg(feature = "onnx")]
pub use backends::OnnxBackend;
