use sign_base::Frame;
use sign_infer::{
    Classifier, HandLandmarks, InferError, InterpretResponse, InterpretTransport, RemoteClassifier,
    RemoteConfig,
};
use std::collections::VecDeque;
use std::rc::Rc;
use std::cell::RefCell;
use std::time::{Duration, Instant};

/// Transport with scripted answers and a shared call counter.
struct ScriptedTransport {
    script: VecDeque<Result<InterpretResponse, InferError>>,
    calls: Rc<RefCell<usize>>,
}

impl InterpretTransport for ScriptedTransport {
    fn interpret(&mut self, image_b64: &str) -> Result<InterpretResponse, InferError> {
        *self.calls.borrow_mut() += 1;
        // The wire always carries raw base64, no data-URI prefix
        assert!(!image_b64.contains("base64,"));
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(InferError::Http("script exhausted".to_string())))
    }
}

fn ok(gesture: &str, confidence: Option<f32>) -> Result<InterpretResponse, InferError> {
    Ok(InterpretResponse {
        gesture: gesture.to_string(),
        confidence,
    })
}

fn err() -> Result<InterpretResponse, InferError> {
    Err(InferError::Http("timed out".to_string()))
}

fn classifier_with(
    script: Vec<Result<InterpretResponse, InferError>>,
) -> (RemoteClassifier, Rc<RefCell<usize>>) {
    let calls = Rc::new(RefCell::new(0));
    let transport = ScriptedTransport {
        script: script.into(),
        calls: calls.clone(),
    };
    let config = RemoteConfig::new("http://localhost/interpret");
    let classifier = RemoteClassifier::with_transport(config, Box::new(transport));
    (classifier, calls)
}

fn frame() -> Frame {
    Frame::new(4, 4, vec![128u8; 48]).unwrap()
}

fn hand() -> HandLandmarks {
    HandLandmarks::empty()
}

#[test]
fn test_success_stores_result_with_service_confidence() {
    let (mut classifier, calls) = classifier_with(vec![ok("hello", Some(0.8))]);
    let detection = classifier
        .classify(&hand(), &frame(), Instant::now())
        .unwrap();
    assert_eq!(detection.gesture, "hello");
    assert_eq!(detection.confidence, 0.8);
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_missing_confidence_defaults() {
    let (mut classifier, _) = classifier_with(vec![ok("yes", None)]);
    let detection = classifier
        .classify(&hand(), &frame(), Instant::now())
        .unwrap();
    assert_eq!(detection.confidence, 0.9);
}

#[test]
fn test_cooldown_reuses_result_without_second_request() {
    let (mut classifier, calls) = classifier_with(vec![ok("hello", Some(0.8)), ok("no", None)]);
    let t0 = Instant::now();

    let first = classifier.classify(&hand(), &frame(), t0).unwrap();
    let second = classifier
        .classify(&hand(), &frame(), t0 + Duration::from_millis(1999))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(*calls.borrow(), 1);

    // At the window edge a new request goes out
    let third = classifier
        .classify(&hand(), &frame(), t0 + Duration::from_millis(2000))
        .unwrap();
    assert_eq!(third.gesture, "no");
    assert_eq!(*calls.borrow(), 2);
}

#[test]
fn test_first_failure_synthesizes_placeholder() {
    // Scenario: remote call times out on the first attempt with no
    // prior result; the second tick falls inside the cooldown window.
    let (mut classifier, calls) = classifier_with(vec![err()]);
    let t0 = Instant::now();

    let detection = classifier.classify(&hand(), &frame(), t0).unwrap();
    assert_eq!(detection.gesture, "Processing...");
    assert_eq!(detection.confidence, 0.5);

    let again = classifier
        .classify(&hand(), &frame(), t0 + Duration::from_millis(500))
        .unwrap();
    assert_eq!(again, detection);
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn test_later_failures_keep_stored_result() {
    let (mut classifier, _) = classifier_with(vec![ok("hello", None), err(), err()]);
    let t0 = Instant::now();
    let cooldown = Duration::from_millis(2000);

    classifier.classify(&hand(), &frame(), t0);
    let after_one_failure = classifier.classify(&hand(), &frame(), t0 + cooldown).unwrap();
    let after_two_failures = classifier
        .classify(&hand(), &frame(), t0 + cooldown * 2)
        .unwrap();

    // Never regress to empty once a result exists
    assert_eq!(after_one_failure.gesture, "hello");
    assert_eq!(after_two_failures.gesture, "hello");
}

#[test]
fn test_no_detection_phrase_does_not_overwrite() {
    let (mut classifier, calls) = classifier_with(vec![
        ok("hello", Some(0.8)),
        ok("No sign detected, unclear", None),
    ]);
    let t0 = Instant::now();
    let cooldown = Duration::from_millis(2000);

    classifier.classify(&hand(), &frame(), t0);
    let kept = classifier.classify(&hand(), &frame(), t0 + cooldown).unwrap();

    assert_eq!(kept.gesture, "hello");
    assert_eq!(kept.confidence, 0.8);
    assert_eq!(*calls.borrow(), 2);
}

#[test]
fn test_empty_gesture_counts_as_failure() {
    let (mut classifier, _) = classifier_with(vec![ok("   ", None)]);
    let detection = classifier
        .classify(&hand(), &frame(), Instant::now())
        .unwrap();
    assert_eq!(detection.gesture, "Processing...");
}

#[test]
fn test_custom_cooldown_is_honored() {
    let (calls, t0) = (Rc::new(RefCell::new(0)), Instant::now());
    let transport = ScriptedTransport {
        script: vec![ok("hello", None), ok("yes", None)].into(),
        calls: calls.clone(),
    };
    let config = RemoteConfig::new("http://localhost/interpret")
        .with_cooldown(Duration::from_millis(100));
    let mut classifier = RemoteClassifier::with_transport(config, Box::new(transport));

    classifier.classify(&hand(), &frame(), t0);
    classifier.classify(&hand(), &frame(), t0 + Duration::from_millis(150));
    assert_eq!(*calls.borrow(), 2);
}
