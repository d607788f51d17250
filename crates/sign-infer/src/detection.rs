use crate::HandLandmarks;

/// One classified gesture, as handed to the display layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// The textual label of the recognized sign.
    pub gesture: String,
    /// Classifier certainty in [0, 1].
    pub confidence: f32,
    /// The landmark set that backed this classification, when the
    /// strategy produces one. The remote strategy classifies stills
    /// and carries no landmarks.
    pub landmarks: Option<HandLandmarks>,
}

impl Detection {
    pub fn new(gesture: impl Into<String>, confidence: f32) -> Self {
        Self {
            gesture: gesture.into(),
            confidence,
            landmarks: None,
        }
    }

    pub fn with_landmarks(mut self, landmarks: HandLandmarks) -> Self {
        self.landmarks = Some(landmarks);
        self
    }
}
