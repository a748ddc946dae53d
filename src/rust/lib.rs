//! A small FAQ assistant: classify a question, answer it from a fixed table.
//!
//! Training fits a bag-of-words vectorizer and a multinomial naive Bayes model
//! on a labeled dataset and stores both as one artifact. Serving loads that
//! artifact and a JSON answer table once, then maps each question to a label
//! and the label to its canned answer.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::collections::HashMap;
//! use faq_assistant::{AnswerTable, FaqService, Trainer, TrainingExample};
//!
//! let examples = vec![
//!     TrainingExample::new("¿Cómo me registro?", "registro"),
//!     TrainingExample::new("Quiero crear una cuenta", "registro"),
//!     TrainingExample::new("¿Cómo cancelo?", "cancelacion"),
//!     TrainingExample::new("Quiero darme de baja", "cancelacion"),
//! ];
//! let outcome = Trainer::default().train(examples)?;
//!
//! let answers = AnswerTable::new(HashMap::from([
//!     ("registro".to_string(), "Visita la pestaña Registro.".to_string()),
//! ]));
//! let service = FaqService::from_parts(outcome.artifact, answers);
//!
//! let answer = service.classify("¿Cómo cancelo mi cuenta?")?;
//! println!("{}: {}", answer.label, answer.answer);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! [`FaqService`] loads its resources at most once and never mutates them
//! afterwards, so it can be shared across threads using `Arc`:
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use faq_assistant::{AssistantPaths, FaqService};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let service = Arc::new(FaqService::new(AssistantPaths::new_default()));
//! service.warm_up()?;
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let service = Arc::clone(&service);
//!     handles.push(thread::spawn(move || {
//!         service.classify("¿Cuánto cuesta?").unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod answers;
pub mod artifact;
pub mod config;
pub mod dataset;
pub mod metrics;
pub mod service;
pub mod trainer;

pub use classifier::{Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, CountVectorizer, DatasetError, NaiveBayes, TextVectorizer};
pub use answers::{AnswerTable, FALLBACK_ANSWER};
pub use artifact::{ArtifactMetadata, ModelArtifact};
pub use config::{AssistantPaths, TrainingConfig};
pub use dataset::{load_dataset, train_test_split, TrainingExample};
pub use metrics::{EvaluationReport, LabelMetrics};
pub use service::{Answer, FaqService, ServiceInfo, ServiceState};
pub use trainer::{train_from_path, Trainer, TrainingOutcome};

pub fn init_logger() {
    env_logger::init();
}
