pub mod fallback;
pub mod local;
pub mod remote;
pub mod transport;

use crate::{Detection, HandLandmarks};
use sign_base::Frame;
use std::time::Instant;

/// Gesture classification strategy.
///
/// Selected once at bundle construction; the detection loop never
/// knows which strategy is active. `classify` must be cheap enough to
/// call every tick: strategies that talk to the network gate
/// themselves on `now` and answer from their stored result inside the
/// cooldown window. Returning `None` means "no gesture this tick" and
/// never signals an error.
pub trait Classifier {
    fn classify(&mut self, landmarks: &HandLandmarks, frame: &Frame, now: Instant) -> Option<Detection>;
}
