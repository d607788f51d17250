use crate::history::TranslationHistory;
use log::{debug, info, warn};
use sign_camera::FrameSource;
use sign_infer::{Detection, ModelBundle};
use std::time::{Duration, Instant};

/// Default settling delay after the frame source first reports ready,
/// so the loop does not read a device still negotiating its stream.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Where the controller is in its lifecycle. Strictly forward except
/// for the jump back to `WaitingForModels` on a language switch; any
/// state may move to `Disposed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    WaitingForModels,
    WaitingForFrameSource,
    Polling,
    Disposed,
}

/// Drives the continuous poll cycle over one frame source and one
/// model bundle.
///
/// The controller is the single mutator of its detection state; the
/// display layer only reads snapshots between ticks. Call `tick` once
/// per scheduling tick — ticks never overlap, and a tick that has
/// nothing to do returns immediately.
pub struct DetectionLoop<S: FrameSource> {
    source: S,
    bundle: ModelBundle,
    state: LoopState,
    hand_present: bool,
    last_result: Option<Detection>,
    last_classify: Option<Instant>,
    ready_since: Option<Instant>,
    settle: Duration,
    history: TranslationHistory,
}

impl<S: FrameSource> DetectionLoop<S> {
    pub fn new(source: S, bundle: ModelBundle) -> Self {
        Self {
            source,
            bundle,
            state: LoopState::Idle,
            hand_present: false,
            last_result: None,
            last_classify: None,
            ready_since: None,
            settle: SETTLE_DELAY,
            history: TranslationHistory::new(),
        }
    }

    /// Set the frame source settling delay (builder pattern)
    pub fn with_settle_delay(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Begin initialization: Idle moves to WaitingForModels.
    pub fn start(&mut self) {
        if self.state == LoopState::Idle {
            self.state = LoopState::WaitingForModels;
        }
    }

    /// Run one scheduling tick at the current time.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Run one scheduling tick at an explicit time. Time only flows
    /// forward through here; tests drive it directly.
    pub fn tick_at(&mut self, now: Instant) {
        match self.state {
            LoopState::Idle | LoopState::Disposed => {}
            LoopState::WaitingForModels => {
                if self.bundle.is_ready() {
                    debug!("models ready, waiting for frame source");
                    self.state = LoopState::WaitingForFrameSource;
                }
                // A Failed bundle parks here; the status text tells the UI.
            }
            LoopState::WaitingForFrameSource => {
                if !self.source.is_ready() {
                    self.ready_since = None;
                    return;
                }
                let since = *self.ready_since.get_or_insert(now);
                if now.duration_since(since) >= self.settle {
                    info!("frame source settled, polling starts");
                    self.state = LoopState::Polling;
                }
            }
            LoopState::Polling => self.poll(now),
        }
    }

    fn poll(&mut self, now: Instant) {
        if !self.source.is_ready() {
            // Reschedule without doing work; a permanently lost source
            // just keeps parking here.
            return;
        }
        let Some(frame) = self.source.latest_frame() else {
            return;
        };

        let Some(estimator) = self.bundle.estimator_mut() else {
            return;
        };
        let landmarks = estimator.estimate(&frame);

        let visible = landmarks.is_clearly_visible();
        self.hand_present = visible;
        if !visible {
            // Clear immediately on hand loss, cooldown state or not
            if self.last_result.take().is_some() {
                debug!("hand lost, clearing last result");
            }
            return;
        }

        let Some(classifier) = self.bundle.classifier_mut() else {
            return;
        };
        if let Some(detection) = classifier.classify(&landmarks, &frame, now) {
            self.history.push(detection.gesture.clone(), detection.confidence);
            self.last_result = Some(detection);
            self.last_classify = Some(now);
        }
        // A None classification keeps the previous result; the display
        // must not flicker on a transient miss.
    }

    /// Latest stable detection, if any.
    pub fn latest_detection(&self) -> Option<&Detection> {
        self.last_result.as_ref()
    }

    /// Whether the last processed frame showed a clearly visible hand.
    pub fn hand_present(&self) -> bool {
        self.hand_present
    }

    /// Human-readable initialization status for the UI layer.
    pub fn initialization_status(&self) -> String {
        if self.state == LoopState::Disposed {
            "Disposed".to_string()
        } else {
            self.bundle.status_text()
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn history(&self) -> &TranslationHistory {
        &self.history
    }

    /// The running translation assembled from accepted detections.
    pub fn transcript(&self) -> String {
        self.history.transcript()
    }

    /// Give the driver access to the bundle, e.g. to run `load`.
    pub fn bundle_mut(&mut self) -> &mut ModelBundle {
        &mut self.bundle
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Swap in a bundle for another language: the old bundle is
    /// disposed, detection state resets, and the loop goes back to
    /// waiting for the new models.
    pub fn switch_language(&mut self, bundle: ModelBundle) {
        if self.state == LoopState::Disposed {
            warn!("ignoring language switch on a disposed loop");
            return;
        }
        info!("switching language: {} -> {}", self.bundle.language(), bundle.language());
        self.bundle.dispose();
        self.bundle = bundle;
        self.hand_present = false;
        self.last_result = None;
        self.last_classify = None;
        self.ready_since = None;
        self.history.clear();
        self.state = LoopState::WaitingForModels;
    }

    /// Tear the loop down: model handles released, further ticks are
    /// no-ops. Idempotent.
    pub fn dispose(&mut self) {
        if self.state == LoopState::Disposed {
            return;
        }
        self.state = LoopState::Disposed;
        self.bundle.dispose();
        self.hand_present = false;
        self.last_result = None;
        debug!("detection loop disposed");
    }
}

impl<S: FrameSource> Drop for DetectionLoop<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
