use crate::classifier::Classifier;
use crate::preprocess::to_nchw;
use crate::{Detection, HandLandmarks, Session};
use log::warn;
use sign_base::Frame;
use std::time::Instant;

/// Probability a local prediction must exceed to count as a detection.
pub const CONFIDENCE_THRESHOLD: f32 = 0.70;

/// The local CNN takes 64x64 normalized crops.
const INPUT_SIZE: usize = 64;

/// Default label set of the bundled sign classifier.
pub const DEFAULT_LABELS: [&str; 5] = ["hello", "thank you", "yes", "no", "please"];

/// On-device classification over a small convolutional model.
///
/// The frame is resized to 64x64, normalized to [0, 1] and run through
/// the session; the top class is returned only when its probability
/// clears the confidence threshold.
pub struct LocalClassifier {
    session: Box<dyn Session>,
    labels: Vec<String>,
    threshold: f32,
}

impl LocalClassifier {
    pub fn new(session: Box<dyn Session>) -> Self {
        Self {
            session,
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
            threshold: CONFIDENCE_THRESHOLD,
        }
    }

    /// Set the label set (builder pattern)
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = labels;
        self
    }

    /// Set the confidence threshold (builder pattern)
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    fn classify_inner(&mut self, frame: &Frame) -> Result<Option<(usize, f32)>, String> {
        let input = to_nchw(frame, INPUT_SIZE);
        let input_name = self
            .session
            .input_names()
            .first()
            .ok_or_else(|| "model has no inputs".to_string())?
            .clone();

        let outputs = self
            .session
            .run(&[(input_name.as_str(), input)])
            .map_err(|e| e.to_string())?;

        // Prefer the model's first declared output; fall back to any
        // output with one probability per label. Never scan the map
        // first, its order is arbitrary.
        let probs = self
            .session
            .output_names()
            .first()
            .and_then(|name| outputs.get(name))
            .filter(|t| t.len() == self.labels.len())
            .or_else(|| outputs.values().find(|t| t.len() == self.labels.len()))
            .ok_or_else(|| {
                format!(
                    "no output with {} class probabilities: {:?}",
                    self.labels.len(),
                    outputs.keys()
                )
            })?;

        let best = probs
            .data
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, &p)| (i, p));
        Ok(best)
    }
}

impl Classifier for LocalClassifier {
    fn classify(&mut self, landmarks: &HandLandmarks, frame: &Frame, _now: Instant) -> Option<Detection> {
        let best = match self.classify_inner(frame) {
            Ok(best) => best,
            Err(e) => {
                warn!("local classification failed: {e}");
                return None;
            }
        };

        let (index, probability) = best?;
        if probability <= self.threshold {
            return None;
        }

        let label = primary_label(&self.labels[index]);
        Some(Detection::new(label, probability).with_landmarks(landmarks.clone()))
    }
}

/// Labels of the form "hello, greeting" reduce to the text before the
/// first comma.
fn primary_label(label: &str) -> String {
    label.split(',').next().unwrap_or(label).trim().to_string()
}
