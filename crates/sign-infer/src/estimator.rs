use crate::landmarks::{HAND_LANDMARK_COUNT, HandLandmarks, Landmark};
use crate::preprocess::to_nchw;
use crate::{Session, Tensor};
use log::{debug, warn};
use sign_base::Frame;
use std::collections::HashMap;

/// Turns one frame into zero or one set of hand landmarks.
///
/// Estimation never fails from the caller's point of view: any
/// internal model error is logged and reported as "no hand this tick".
pub trait LandmarkEstimator {
    fn estimate(&mut self, frame: &Frame) -> HandLandmarks;
}

const DEFAULT_INPUT_SIZE: usize = 224;
const DEFAULT_PRESENCE_THRESHOLD: f32 = 0.5;

/// Handpose landmark estimator backed by an inference `Session`.
///
/// The model takes a normalized NCHW frame and produces 21 keypoints in
/// input-pixel scale plus a scalar hand-presence score. Coordinates are
/// normalized to [0, 1] against the input size; a score below the
/// presence threshold yields the empty set.
pub struct SessionLandmarkEstimator {
    session: Box<dyn Session>,
    input_size: usize,
    presence_threshold: f32,
}

impl SessionLandmarkEstimator {
    pub fn new(session: Box<dyn Session>) -> Self {
        Self {
            session,
            input_size: DEFAULT_INPUT_SIZE,
            presence_threshold: DEFAULT_PRESENCE_THRESHOLD,
        }
    }

    /// Set the model input resolution (builder pattern)
    pub fn with_input_size(mut self, input_size: usize) -> Self {
        self.input_size = input_size;
        self
    }

    /// Set the hand-presence score threshold (builder pattern)
    pub fn with_presence_threshold(mut self, threshold: f32) -> Self {
        self.presence_threshold = threshold;
        self
    }

    pub fn presence_threshold(&self) -> f32 {
        self.presence_threshold
    }

    fn estimate_inner(&mut self, frame: &Frame) -> Result<HandLandmarks, String> {
        let input = to_nchw(frame, self.input_size);
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

        let (coords, score) = split_outputs(&outputs)
            .ok_or_else(|| format!("unexpected output set: {:?}", outputs.keys()))?;

        if let Some(score) = score {
            if score < self.presence_threshold {
                return Ok(HandLandmarks::empty());
            }
        }

        // Coordinates arrive in input-pixel scale; normalize so the
        // visibility gate can reason in [0, 1]. Points outside the
        // input stay outside [0, 1] and get rejected downstream.
        let stride = coords.len() / HAND_LANDMARK_COUNT;
        let scale = self.input_size as f32;
        let points = coords
            .data
            .chunks(stride)
            .map(|chunk| Landmark {
                x: chunk[0] / scale,
                y: chunk[1] / scale,
            })
            .collect();
        Ok(HandLandmarks::from_points(points))
    }
}

impl LandmarkEstimator for SessionLandmarkEstimator {
    fn estimate(&mut self, frame: &Frame) -> HandLandmarks {
        match self.estimate_inner(frame) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                // Detection failures are "no hand this tick", never fatal
                warn!("landmark estimation failed: {e}");
                HandLandmarks::empty()
            }
        }
    }
}

/// Pick the landmark tensor (21 points, 2 or 3 values each) and the
/// optional scalar presence score out of the model outputs.
fn split_outputs(outputs: &HashMap<String, Tensor>) -> Option<(&Tensor, Option<f32>)> {
    let mut coords = None;
    let mut score = None;
    for tensor in outputs.values() {
        match tensor.len() {
            n if n == HAND_LANDMARK_COUNT * 2 || n == HAND_LANDMARK_COUNT * 3 => {
                coords = Some(tensor)
            }
            1 => score = Some(tensor.data[0]),
            n => debug!("ignoring model output with {n} elements"),
        }
    }
    coords.map(|c| (c, score))
}
