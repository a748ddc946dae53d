use log::info;

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::model::NaiveBayes;
use super::vectorizer::CountVectorizer;
use crate::dataset::TrainingExample;

/// Default additive smoothing for the naive Bayes model
pub const DEFAULT_ALPHA: f64 = 1.0;

/// A builder for fitting a Classifier with a fluent interface.
#[derive(Debug, Clone)]
pub struct ClassifierBuilder {
    texts: Vec<String>,
    labels: Vec<String>,
    alpha: f64,
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierBuilder {
    /// Creates a new empty ClassifierBuilder with the default smoothing
    ///
    /// # Example
    /// ```
    /// use faq_assistant::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            texts: Vec::new(),
            labels: Vec::new(),
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Sets the additive smoothing applied to term counts
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Validates a single example:
    /// - Text must not be empty or whitespace
    /// - Label must not be empty or whitespace
    fn validate_example(text: &str, label: &str) -> Result<(), ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::Training("Example text cannot be empty".into()));
        }
        if label.trim().is_empty() {
            return Err(ClassifierError::Training(format!(
                "Example '{}' has an empty label",
                text
            )));
        }
        Ok(())
    }

    /// Adds one labeled example
    ///
    /// # Example
    /// ```
    /// use faq_assistant::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .add_example("¿Cuánto cuesta?", "precio");
    /// assert!(builder.is_ok());
    /// ```
    pub fn add_example(
        mut self,
        text: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<Self, ClassifierError> {
        let text = text.into();
        let label = label.into();
        Self::validate_example(&text, &label)?;
        self.texts.push(text);
        self.labels.push(label);
        Ok(self)
    }

    /// Adds every example from a loaded dataset partition
    pub fn add_examples<'a>(
        mut self,
        examples: impl IntoIterator<Item = &'a TrainingExample>,
    ) -> Result<Self, ClassifierError> {
        for example in examples {
            self = self.add_example(example.text.as_str(), example.label.as_str())?;
        }
        Ok(self)
    }

    /// Fits the vectorizer on the example texts, then the model on their counts
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The fitted Classifier, or an error if:
    ///   - No examples have been added
    ///   - The examples yield an empty vocabulary
    ///   - The smoothing parameter is not positive
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        if self.texts.is_empty() {
            return Err(ClassifierError::Training("At least one example must be added".into()));
        }

        let (vectorizer, features) = CountVectorizer::fit_transform(&self.texts)?;
        info!(
            "Vectorizer fitted on {} texts ({} terms)",
            self.texts.len(),
            vectorizer.vocabulary().len()
        );

        let model = NaiveBayes::fit(&features, &self.labels, self.alpha)?;
        info!("Model fitted with {} classes", model.classes().len());

        Ok(Classifier { vectorizer, model })
    }
}
