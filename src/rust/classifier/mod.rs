mod error;
mod vectorizer;
mod model;
mod classifier;
pub mod builder;
mod utils;

pub use error::{ClassifierError, DatasetError};
pub use vectorizer::{tokenize, CountVectorizer, TextVectorizer};
pub use model::NaiveBayes;
pub use classifier::Classifier;
pub use builder::ClassifierBuilder;

/// Summary of a fitted classifier
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierInfo {
    /// Number of labels the classifier can produce
    pub num_classes: usize,
    /// The labels, in sorted order
    pub class_labels: Vec<String>,
    /// Number of terms in the frozen vocabulary
    pub vocabulary_size: usize,
    /// Additive smoothing used at fit time
    pub alpha: f64,
}
