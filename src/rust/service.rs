use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerTable;
use crate::artifact::{ArtifactMetadata, ModelArtifact};
use crate::classifier::{Classifier, ClassifierError, ClassifierInfo};
use crate::config::AssistantPaths;

/// A classified question: the predicted label and the answer it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub label: String,
    pub answer: String,
}

/// Everything `classify` needs, loaded together
#[derive(Debug)]
struct Resources {
    artifact: ModelArtifact,
    answers: AnswerTable,
}

/// Where a service is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Nothing loaded yet, or the last load attempt failed
    Uninitialized,
    /// Artifact and answer table are loaded and immutable
    Ready,
}

/// Answers questions from a trained artifact and an answer table.
///
/// Both files are read on the first call that needs them and kept for the
/// lifetime of the service. A failed load is not cached, so the next call
/// tries again; once loading succeeds it never happens again.
///
/// The service is `Send + Sync`; share it behind an `Arc` to serve from
/// several threads.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use faq_assistant::{AssistantPaths, FaqService};
///
/// let service = FaqService::new(AssistantPaths::in_dir("/srv/faq"));
/// let answer = service.classify("¿Cómo me registro?")?;
/// println!("[{}] {}", answer.label, answer.answer);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FaqService {
    paths: AssistantPaths,
    resources: OnceCell<Resources>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<FaqService>();
    }
};

impl FaqService {
    /// Creates a service that will load from `paths` on first use
    pub fn new(paths: AssistantPaths) -> Self {
        Self {
            paths,
            resources: OnceCell::new(),
        }
    }

    /// Creates a service that is ready immediately, without touching the filesystem
    pub fn from_parts(artifact: ModelArtifact, answers: AnswerTable) -> Self {
        Self {
            paths: AssistantPaths::default(),
            resources: OnceCell::with_value(Resources { artifact, answers }),
        }
    }

    pub fn paths(&self) -> &AssistantPaths {
        &self.paths
    }

    pub fn state(&self) -> ServiceState {
        if self.resources.get().is_some() {
            ServiceState::Ready
        } else {
            ServiceState::Uninitialized
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ServiceState::Ready
    }

    /// Loads the artifact and answer table now instead of on the first question.
    ///
    /// Calling it again after a successful load does nothing.
    pub fn warm_up(&self) -> Result<(), ClassifierError> {
        self.resources().map(|_| ())
    }

    fn resources(&self) -> Result<&Resources, ClassifierError> {
        self.resources.get_or_try_init(|| {
            log::info!("Loading classifier resources");
            let artifact = ModelArtifact::load(&self.paths.artifact)?;
            let answers = AnswerTable::load(&self.paths.answers)?;
            let classifier = &artifact.classifier;
            for label in classifier.model().classes() {
                if !answers.contains(label) {
                    log::warn!("Label '{}' has no answer; the fallback will be used", label);
                }
            }
            log::info!(
                "Classifier ready: {} labels, {} answers",
                classifier.model().classes().len(),
                answers.len()
            );
            Ok(Resources { artifact, answers })
        })
    }

    /// Predicts the label of `question` and returns it with its answer.
    ///
    /// Any string is accepted, including an empty one; rejecting blank input
    /// is up to the caller. A label missing from the answer table gets the
    /// fallback answer, not an error.
    ///
    /// # Errors
    /// Only loading can fail: `ArtifactNotFound`, `ArtifactCorrupt`, `AnswerTable`, `Io`.
    pub fn classify(&self, question: &str) -> Result<Answer, ClassifierError> {
        let resources = self.resources()?;
        let label = resources.artifact.classifier.predict(question);
        let answer = resources.answers.lookup(label);
        log::debug!("Classified {:?} as '{}'", question, label);
        Ok(Answer {
            label: label.to_string(),
            answer: answer.to_string(),
        })
    }

    /// The loaded classifier
    pub fn classifier(&self) -> Result<&Classifier, ClassifierError> {
        Ok(&self.resources()?.artifact.classifier)
    }

    /// Summary of the loaded model
    pub fn info(&self) -> Result<ServiceInfo, ClassifierError> {
        let resources = self.resources()?;
        let classifier = resources.artifact.classifier.info();
        let unanswered_labels = classifier
            .class_labels
            .iter()
            .filter(|l| !resources.answers.contains(l))
            .cloned()
            .collect();
        Ok(ServiceInfo {
            classifier,
            metadata: resources.artifact.metadata.clone(),
            num_answers: resources.answers.len(),
            unanswered_labels,
            fallback_answer: resources.answers.fallback().to_string(),
        })
    }
}

/// Summary of a ready service
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInfo {
    pub classifier: ClassifierInfo,
    pub metadata: ArtifactMetadata,
    pub num_answers: usize,
    /// Labels the model can predict that resolve to the fallback answer
    pub unanswered_labels: Vec<String>,
    pub fallback_answer: String,
}
