use crate::Detection;
use std::time::{SystemTime, UNIX_EPOCH};

/// Gesture shown while the remote service has never answered.
pub const PLACEHOLDER_GESTURE: &str = "Processing...";
pub const PLACEHOLDER_CONFIDENCE: f32 = 0.5;

/// What the remote strategy falls back to when a call fails.
///
/// Invoked with the stored result, if any; a stored result must be
/// carried forward so the display never regresses to empty. Keeping
/// this a plain function keeps the nondeterministic variants out of
/// the core path and swappable in tests.
pub type FallbackPolicy = fn(Option<&Detection>) -> Detection;

/// Deterministic default: keep the previous result, or show the
/// low-confidence placeholder when there has never been one.
pub fn placeholder_fallback(previous: Option<&Detection>) -> Detection {
    match previous {
        Some(detection) => detection.clone(),
        None => Detection::new(PLACEHOLDER_GESTURE, PLACEHOLDER_CONFIDENCE),
    }
}

const FRIENDLY_GUESSES: [&str; 6] = ["Hello", "Thank you", "Friend", "Learn", "Play", "Happy"];

/// Guessing policy: instead of the placeholder, offer a friendly sign
/// so the display never reads as stalled. Previous results still win.
pub fn friendly_guess_fallback(previous: Option<&Detection>) -> Detection {
    if let Some(detection) = previous {
        return detection.clone();
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos() as usize;
    let guess = FRIENDLY_GUESSES[nanos % FRIENDLY_GUESSES.len()];
    Detection::new(guess, PLACEHOLDER_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_without_previous() {
        let detection = placeholder_fallback(None);
        assert_eq!(detection.gesture, PLACEHOLDER_GESTURE);
        assert_eq!(detection.confidence, PLACEHOLDER_CONFIDENCE);
    }

    #[test]
    fn test_previous_result_is_carried_forward() {
        let previous = Detection::new("hello", 0.9);
        assert_eq!(placeholder_fallback(Some(&previous)), previous);
        assert_eq!(friendly_guess_fallback(Some(&previous)), previous);
    }

    #[test]
    fn test_friendly_guess_picks_from_list() {
        let detection = friendly_guess_fallback(None);
        assert!(FRIENDLY_GUESSES.contains(&detection.gesture.as_str()));
    }
}
