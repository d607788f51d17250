use crate::classifier::Classifier;
use crate::classifier::local::LocalClassifier;
use crate::classifier::remote::{RemoteClassifier, RemoteConfig};
use crate::estimator::{LandmarkEstimator, SessionLandmarkEstimator};
use crate::{Backend, InferError, ModelSource};
use log::{debug, info};
use std::fmt;

/// Which sign language's model set a bundle serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignLanguage {
    Asl,
    Fsl,
}

impl fmt::Display for SignLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignLanguage::Asl => write!(f, "ASL"),
            SignLanguage::Fsl => write!(f, "FSL"),
        }
    }
}

impl std::str::FromStr for SignLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASL" => Ok(SignLanguage::Asl),
            "FSL" => Ok(SignLanguage::Fsl),
            other => Err(format!("unknown sign language: {other}")),
        }
    }
}

/// Load progress of one model bundle. Transitions are strictly
/// forward; any loading step may jump to `Failed`, nothing moves
/// backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleStatus {
    NotStarted,
    LoadingBackend,
    LoadingLandmarkModel,
    LoadingClassifier,
    Ready,
    Failed,
}

impl fmt::Display for BundleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BundleStatus::NotStarted => "Not started",
            BundleStatus::LoadingBackend => "Preparing inference backend...",
            BundleStatus::LoadingLandmarkModel => "Loading hand landmark model...",
            BundleStatus::LoadingClassifier => "Loading sign classifier...",
            BundleStatus::Ready => "Models loaded successfully",
            BundleStatus::Failed => "Model loading failed",
        };
        write!(f, "{text}")
    }
}

/// Classification strategy selected at bundle construction.
pub enum ClassifierConfig {
    Local {
        model: ModelSource,
        labels: Option<Vec<String>>,
    },
    Remote(RemoteConfig),
}

/// Everything needed to load one bundle.
pub struct BundleConfig {
    landmark_model: ModelSource,
    classifier: ClassifierConfig,
}

impl BundleConfig {
    pub fn new(landmark_model: ModelSource, classifier: ClassifierConfig) -> Self {
        Self {
            landmark_model,
            classifier,
        }
    }
}

/// The loaded inference resources for one language session.
///
/// Owns the landmark estimator and the classifier; the only writer of
/// `status` and the only place allowed to release the model handles.
/// A language switch is dispose-old-then-create-new, never in-place
/// mutation.
pub struct ModelBundle {
    language: SignLanguage,
    status: BundleStatus,
    estimator: Option<Box<dyn LandmarkEstimator>>,
    classifier: Option<Box<dyn Classifier>>,
    disposed: bool,
}

impl ModelBundle {
    /// An unloaded bundle; call `load` to bring the models up.
    pub fn new(language: SignLanguage) -> Self {
        Self {
            language,
            status: BundleStatus::NotStarted,
            estimator: None,
            classifier: None,
            disposed: false,
        }
    }

    /// Assemble a bundle from already-built parts, ready immediately.
    /// Used by callers that construct their own strategies and by
    /// tests.
    pub fn from_parts(
        language: SignLanguage,
        estimator: Box<dyn LandmarkEstimator>,
        classifier: Box<dyn Classifier>,
    ) -> Self {
        Self {
            language,
            status: BundleStatus::Ready,
            estimator: Some(estimator),
            classifier: Some(classifier),
            disposed: false,
        }
    }

    /// Sequence the loading steps: backend readiness, landmark model,
    /// classifier. On failure the status sticks at `Failed` and the
    /// error is returned; a manual retry means building a new bundle.
    pub fn load(&mut self, backend: &dyn Backend, config: BundleConfig) -> Result<(), InferError> {
        if self.status != BundleStatus::NotStarted {
            return Err(InferError::ModelLoad(format!(
                "bundle for {} already {}",
                self.language, self.status
            )));
        }

        match self.load_inner(backend, config) {
            Ok(()) => {
                self.status = BundleStatus::Ready;
                info!("{} bundle ready", self.language);
                Ok(())
            }
            Err(e) => {
                self.status = BundleStatus::Failed;
                Err(e)
            }
        }
    }

    fn load_inner(&mut self, backend: &dyn Backend, config: BundleConfig) -> Result<(), InferError> {
        self.status = BundleStatus::LoadingBackend;
        debug!("loading {} bundle on backend '{}'", self.language, backend.name());

        self.status = BundleStatus::LoadingLandmarkModel;
        let session = backend.load_model(config.landmark_model)?;
        self.estimator = Some(Box::new(SessionLandmarkEstimator::new(session)));

        self.status = BundleStatus::LoadingClassifier;
        let classifier: Box<dyn Classifier> = match config.classifier {
            ClassifierConfig::Local { model, labels } => {
                let session = backend.load_model(model)?;
                let mut local = LocalClassifier::new(session);
                if let Some(labels) = labels {
                    local = local.with_labels(labels);
                }
                Box::new(local)
            }
            ClassifierConfig::Remote(remote_config) => {
                Box::new(RemoteClassifier::new(remote_config))
            }
        };
        self.classifier = Some(classifier);

        Ok(())
    }

    pub fn language(&self) -> SignLanguage {
        self.language
    }

    pub fn status(&self) -> BundleStatus {
        self.status
    }

    /// Human-readable status line for the UI layer.
    pub fn status_text(&self) -> String {
        self.status.to_string()
    }

    pub fn is_ready(&self) -> bool {
        !self.disposed && self.status == BundleStatus::Ready
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn estimator_mut(&mut self) -> Option<&mut (dyn LandmarkEstimator + 'static)> {
        self.estimator.as_deref_mut()
    }

    pub fn classifier_mut(&mut self) -> Option<&mut (dyn Classifier + 'static)> {
        self.classifier.as_deref_mut()
    }

    /// Release the model handles. Idempotent; safe to call any number
    /// of times.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.estimator = None;
        self.classifier = None;
        debug!("{} bundle disposed", self.language);
    }
}

impl Drop for ModelBundle {
    fn drop(&mut self) {
        self.dispose();
    }
}
