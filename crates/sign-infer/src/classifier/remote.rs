use crate::classifier::Classifier;
use crate::classifier::fallback::{FallbackPolicy, placeholder_fallback};
use crate::classifier::transport::{HttpTransport, InterpretTransport};
use crate::{Detection, HandLandmarks, InferError};
use base64::Engine as _;
use base64::engine::general_purpose;
use image::ImageEncoder;
use log::{debug, warn};
use sign_base::Frame;
use std::time::{Duration, Instant};

/// Minimum interval between outbound interpretation calls.
pub const CLASSIFY_COOLDOWN: Duration = Duration::from_millis(2000);

/// Timeout covering the whole interpretation request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Confidence assigned when the service does not supply one.
pub const REMOTE_DEFAULT_CONFIDENCE: f32 = 0.9;

const JPEG_QUALITY: u8 = 95;

/// Responses that really mean "nothing recognized"; matched
/// case-insensitively as substrings and discarded.
const NO_DETECTION_PHRASES: [&str; 12] = [
    "no sign detected",
    "not sure",
    "unclear",
    "cannot identify",
    "no clear sign",
    "no gesture",
    "no hand sign",
    "uncertain",
    "i don't see",
    "i cannot see",
    "i can't see",
    "processing",
];

/// Configuration of the remote interpretation strategy.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    endpoint: String,
    timeout: Duration,
    cooldown: Duration,
    mirrored: bool,
    jpeg_quality: u8,
}

impl RemoteConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: REQUEST_TIMEOUT,
            cooldown: CLASSIFY_COOLDOWN,
            mirrored: true,
            jpeg_quality: JPEG_QUALITY,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the minimum interval between outbound calls.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Set whether captured frames come from a mirrored preview and
    /// need un-flipping before they go to the service.
    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Set the JPEG quality of captured stills (0-100).
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    // Getters
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn mirrored(&self) -> bool {
        self.mirrored
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }
}

/// Remote interpretation strategy.
///
/// At most one outbound call per cooldown window; ticks inside the
/// window answer from the stored result without queuing. The stored
/// result is never dropped on failure: the first failure synthesizes
/// the fallback policy's detection, later ones keep whatever is stored
/// so the display does not flicker.
pub struct RemoteClassifier {
    transport: Box<dyn InterpretTransport>,
    cooldown: Duration,
    mirrored: bool,
    jpeg_quality: u8,
    fallback: FallbackPolicy,
    last_call: Option<Instant>,
    stored: Option<Detection>,
}

impl RemoteClassifier {
    pub fn new(config: RemoteConfig) -> Self {
        let transport = HttpTransport::new(config.endpoint().to_string(), config.timeout());
        Self::with_transport(config, Box::new(transport))
    }

    /// Build on a caller-supplied transport. This is the test seam.
    pub fn with_transport(config: RemoteConfig, transport: Box<dyn InterpretTransport>) -> Self {
        Self {
            transport,
            cooldown: config.cooldown(),
            mirrored: config.mirrored(),
            jpeg_quality: config.jpeg_quality(),
            fallback: placeholder_fallback,
            last_call: None,
            stored: None,
        }
    }

    /// Swap the fallback policy (builder pattern)
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn stored_result(&self) -> Option<&Detection> {
        self.stored.as_ref()
    }

    fn call_service(&mut self, frame: &Frame) {
        let image = match encode_jpeg_base64(frame, self.mirrored, self.jpeg_quality) {
            Ok(image) => image,
            Err(e) => {
                warn!("still capture failed: {e}");
                self.stored = Some((self.fallback)(self.stored.as_ref()));
                return;
            }
        };

        match self.transport.interpret(strip_data_uri(&image)) {
            Ok(response) => {
                let gesture = response.gesture.trim();
                if gesture.is_empty() {
                    warn!("interpretation service returned an empty gesture");
                    self.stored = Some((self.fallback)(self.stored.as_ref()));
                } else if is_no_detection(gesture) {
                    // Ambiguous answer: a no-op, not an error
                    debug!("discarding non-detection response: {gesture:?}");
                } else {
                    let confidence = response.confidence.unwrap_or(REMOTE_DEFAULT_CONFIDENCE);
                    self.stored = Some(Detection::new(gesture, confidence));
                }
            }
            Err(e) => {
                warn!("interpretation call failed: {e}");
                self.stored = Some((self.fallback)(self.stored.as_ref()));
            }
        }
    }
}

impl Classifier for RemoteClassifier {
    fn classify(&mut self, _landmarks: &HandLandmarks, frame: &Frame, now: Instant) -> Option<Detection> {
        // Timestamp gate doubles as the concurrency guard: there is
        // never a second in-flight call.
        if let Some(last) = self.last_call {
            if now.duration_since(last) < self.cooldown {
                return self.stored.clone();
            }
        }
        self.last_call = Some(now);

        self.call_service(frame);
        self.stored.clone()
    }
}

/// Matches the fixed set of "nothing recognized" phrases.
pub fn is_no_detection(text: &str) -> bool {
    let lowered = text.to_lowercase();
    NO_DETECTION_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

/// Strip a `data:image/jpeg;base64,` style prefix, leaving raw base64.
pub fn strip_data_uri(image: &str) -> &str {
    match image.split_once("base64,") {
        Some((_, rest)) => rest,
        None => image,
    }
}

/// Encode a frame as base64 JPEG for the wire, un-mirroring first when
/// the source preview flips horizontally.
fn encode_jpeg_base64(frame: &Frame, mirrored: bool, quality: u8) -> Result<String, InferError> {
    let buffer = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
        .ok_or_else(|| InferError::Encode("frame buffer does not match dimensions".to_string()))?;

    let buffer = if mirrored {
        image::imageops::flip_horizontal(&buffer)
    } else {
        buffer
    };

    let mut jpeg = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg, quality).write_image(
        buffer.as_raw(),
        buffer.width(),
        buffer.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(general_purpose::STANDARD.encode(&jpeg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_detection_phrase_matching() {
        assert!(is_no_detection("No sign detected, unclear"));
        assert!(is_no_detection("UNCLEAR"));
        assert!(is_no_detection("I don't see a hand"));
        assert!(!is_no_detection("hello"));
        assert!(!is_no_detection("Thank you"));
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/jpeg;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
    }

    #[test]
    fn test_encode_produces_valid_base64_jpeg() {
        let frame = Frame::new(4, 4, vec![200u8; 48]).unwrap();
        let encoded = encode_jpeg_base64(&frame, true, 95).unwrap();
        let bytes = general_purpose::STANDARD.decode(encoded).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xff, 0xd8]);
    }
}
