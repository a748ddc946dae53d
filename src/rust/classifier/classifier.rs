use serde::{Deserialize, Serialize};

use super::model::NaiveBayes;
use super::vectorizer::{CountVectorizer, TextVectorizer};

/// A fitted question classifier: the vectorizer and the model it was trained with.
///
/// The two halves are always fitted and stored together, so the model's feature
/// columns line up with the vectorizer's vocabulary.
///
/// # Thread Safety
///
/// All fields are plain owned data, so the type is `Send + Sync` and can be
/// shared across threads behind an `Arc` without locking.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use faq_assistant::Classifier;
///
/// let classifier = Classifier::builder()
///     .add_example("¿Cómo me registro?", "registro")?
///     .add_example("¿Cómo cancelo?", "cancelacion")?
///     .build()?;
///
/// assert_eq!(classifier.predict("¿Cómo cancelo mi cuenta?"), "cancelacion");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classifier {
    pub(crate) vectorizer: CountVectorizer,
    pub(crate) model: NaiveBayes,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the fitted classifier
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_classes: self.model.classes().len(),
            class_labels: self.model.classes().to_vec(),
            vocabulary_size: self.vectorizer.num_features(),
            alpha: self.model.alpha(),
        }
    }

    pub fn vectorizer(&self) -> &CountVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &NaiveBayes {
        &self.model
    }

    /// Predicts the label of `text`.
    ///
    /// Never fails: words outside the vocabulary are ignored, and a text with
    /// no known words gets the class with the highest prior.
    pub fn predict(&self, text: &str) -> &str {
        let features = self.vectorizer.transform(text);
        self.model.predict(&features)
    }

    /// Predicts a label for every text, in order.
    pub fn predict_batch<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts.iter().map(|t| self.predict(t.as_ref()).to_string()).collect()
    }

    /// Label probabilities for `text`, sorted from most to least likely.
    pub fn scores(&self, text: &str) -> Vec<(String, f64)> {
        let features = self.vectorizer.transform(text);
        let proba = self.model.predict_proba(&features);
        let mut scores: Vec<(String, f64)> = self
            .model
            .classes()
            .iter()
            .cloned()
            .zip(proba.iter().copied())
            .collect();
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_classifier() -> Classifier {
        Classifier::builder()
            .add_example("¿Cómo me registro?", "registro")
            .unwrap()
            .add_example("Quiero crear una cuenta nueva", "registro")
            .unwrap()
            .add_example("¿Cómo cancelo?", "cancelacion")
            .unwrap()
            .add_example("Quiero darme de baja", "cancelacion")
            .unwrap()
            .build()
            .expect("Failed to create classifier")
    }

    #[test]
    fn test_class_info() {
        let classifier = setup_test_classifier();
        let info = classifier.info();
        assert_eq!(info.num_classes, 2);
        assert_eq!(info.class_labels, vec!["cancelacion", "registro"]);
        assert_eq!(info.vocabulary_size, classifier.vectorizer().num_features());
    }

    #[test]
    fn test_predicted_labels_come_from_training_set() {
        let classifier = setup_test_classifier();
        let labels = classifier.info().class_labels;
        for text in ["", "   ", "xyz qwerty", "¿registro o baja?", "😀", "cuenta"] {
            let label = classifier.predict(text);
            assert!(labels.iter().any(|l| l == label), "unexpected label {label}");
        }
    }

    #[test]
    fn test_scores_are_sorted_probabilities() {
        let classifier = setup_test_classifier();
        let scores = classifier.scores("darme de baja");
        assert_eq!(scores[0].0, "cancelacion");
        assert!(scores[0].1 >= scores[1].1);
        let total: f64 = scores.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let classifier = setup_test_classifier();
        let first = classifier.predict("crear cuenta").to_string();
        for _ in 0..5 {
            assert_eq!(classifier.predict("crear cuenta"), first);
        }
    }
}
