use sign_base::Frame;
use sign_infer::{
    Classifier, HandLandmarks, InferError, Landmark, LocalClassifier, Session, Tensor,
};
use std::collections::HashMap;
use std::time::Instant;

/// Session that always answers with a fixed probability vector.
struct ProbsSession {
    probs: Vec<f32>,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl ProbsSession {
    fn new(probs: Vec<f32>) -> Self {
        Self {
            probs,
            input_names: vec!["image".to_string()],
            output_names: vec!["probabilities".to_string()],
        }
    }
}

impl Session for ProbsSession {
    fn run(&mut self, inputs: &[(&str, Tensor)]) -> Result<HashMap<String, Tensor>, InferError> {
        // The classifier must hand us a 64x64 normalized NCHW tensor
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].1.shape, vec![1, 3, 64, 64]);
        let mut out = HashMap::new();
        out.insert(
            "probabilities".to_string(),
            Tensor::new(vec![1, self.probs.len()], self.probs.clone()).unwrap(),
        );
        Ok(out)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

fn frame() -> Frame {
    Frame::new(8, 8, vec![100u8; 8 * 8 * 3]).unwrap()
}

fn hand() -> HandLandmarks {
    HandLandmarks::from_points(vec![Landmark { x: 0.5, y: 0.5 }; 21])
}

fn classify(probs: Vec<f32>) -> Option<sign_infer::Detection> {
    let mut classifier = LocalClassifier::new(Box::new(ProbsSession::new(probs)));
    classifier.classify(&hand(), &frame(), Instant::now())
}

#[test]
fn test_detection_above_threshold() {
    // Default labels: hello, thank you, yes, no, please
    let detection = classify(vec![0.85, 0.05, 0.04, 0.03, 0.03]).unwrap();
    assert_eq!(detection.gesture, "hello");
    assert_eq!(detection.confidence, 0.85);
    assert_eq!(detection.landmarks.as_ref().unwrap().len(), 21);
}

#[test]
fn test_no_detection_at_or_below_threshold() {
    // A detection is returned iff probability strictly exceeds 0.70
    assert!(classify(vec![0.70, 0.10, 0.10, 0.05, 0.05]).is_none());
    assert!(classify(vec![0.60, 0.10, 0.10, 0.10, 0.10]).is_none());
}

#[test]
fn test_argmax_picks_the_top_class() {
    let detection = classify(vec![0.01, 0.02, 0.90, 0.03, 0.04]).unwrap();
    assert_eq!(detection.gesture, "yes");
}

#[test]
fn test_comma_labels_are_truncated() {
    let session = ProbsSession::new(vec![0.95, 0.05]);
    let mut classifier = LocalClassifier::new(Box::new(session))
        .with_labels(vec!["hello, greeting".to_string(), "no".to_string()]);
    let detection = classifier.classify(&hand(), &frame(), Instant::now()).unwrap();
    assert_eq!(detection.gesture, "hello");
}

#[test]
fn test_first_declared_output_wins_over_same_length_extras() {
    // A model with an auxiliary head the same length as the class
    // vector: the declared-first output must be the one classified.
    struct TwoHeadSession {
        input_names: Vec<String>,
        output_names: Vec<String>,
    }

    impl Session for TwoHeadSession {
        fn run(
            &mut self,
            _inputs: &[(&str, Tensor)],
        ) -> Result<HashMap<String, Tensor>, InferError> {
            let mut out = HashMap::new();
            out.insert(
                "probabilities".to_string(),
                Tensor::new(vec![1, 5], vec![0.02, 0.9, 0.03, 0.03, 0.02]).unwrap(),
            );
            out.insert(
                "embedding".to_string(),
                Tensor::new(vec![1, 5], vec![0.99, 0.0, 0.0, 0.0, 0.0]).unwrap(),
            );
            Ok(out)
        }

        fn input_names(&self) -> &[String] {
            &self.input_names
        }

        fn output_names(&self) -> &[String] {
            &self.output_names
        }
    }

    let session = TwoHeadSession {
        input_names: vec!["image".to_string()],
        output_names: vec!["probabilities".to_string(), "embedding".to_string()],
    };
    let mut classifier = LocalClassifier::new(Box::new(session));
    // HashMap iteration order must not leak through: classify many
    // times and require the declared output every time.
    for _ in 0..8 {
        let detection = classifier.classify(&hand(), &frame(), Instant::now()).unwrap();
        assert_eq!(detection.gesture, "thank you");
    }
}

#[test]
fn test_wrongly_sized_output_is_no_detection() {
    // Three probabilities against five labels: logged and dropped
    assert!(classify(vec![0.9, 0.05, 0.05]).is_none());
}
