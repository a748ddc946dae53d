use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use crate::artifact::{ArtifactMetadata, ModelArtifact};
use crate::classifier::{Classifier, ClassifierError};
use crate::config::TrainingConfig;
use crate::dataset::{load_dataset, train_test_split, TrainingExample};
use crate::metrics::EvaluationReport;

/// Result of a training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    /// Holdout evaluation; `None` when the holdout partition is empty
    pub report: Option<EvaluationReport>,
    /// The withheld rows, in split order
    pub holdout: Vec<TrainingExample>,
}

/// Fits classifiers from labeled examples.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    config: TrainingConfig,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Splits, fits and evaluates.
    ///
    /// The vectorizer only ever sees the training partition. A poor holdout
    /// score is reported but never stops the run.
    pub fn train(&self, examples: Vec<TrainingExample>) -> Result<TrainingOutcome, ClassifierError> {
        if examples.is_empty() {
            return Err(ClassifierError::Training("No examples to train on".into()));
        }
        let start = Instant::now();

        let (train, holdout) = train_test_split(examples, self.config.test_size, self.config.seed);
        info!(
            "Training on {} examples, holding out {} (seed {})",
            train.len(),
            holdout.len(),
            self.config.seed
        );

        let classifier = Classifier::builder()
            .with_alpha(self.config.alpha)
            .add_examples(&train)?
            .build()?;

        let report = if holdout.is_empty() {
            warn!("Holdout partition is empty; skipping evaluation");
            None
        } else {
            let texts: Vec<&str> = holdout.iter().map(|e| e.text.as_str()).collect();
            let actual: Vec<&str> = holdout.iter().map(|e| e.label.as_str()).collect();
            let predicted = classifier.predict_batch(&texts);
            let report = EvaluationReport::from_predictions(&actual, &predicted);
            info!("Holdout accuracy: {:.2}", report.accuracy);
            Some(report)
        };

        let metadata = ArtifactMetadata {
            crate_version: env!("CARGO_PKG_VERSION").to_string(),
            seed: self.config.seed,
            train_size: train.len(),
            holdout_size: holdout.len(),
            holdout_accuracy: report.as_ref().map(|r| r.accuracy),
        };

        info!("Training finished in {:.2?}", start.elapsed());
        Ok(TrainingOutcome {
            artifact: ModelArtifact::new(classifier, metadata),
            report,
            holdout,
        })
    }
}

/// Loads the dataset, trains, and writes the artifact.
///
/// Any failure before the final write leaves the previous artifact, if any,
/// untouched.
pub fn train_from_path(
    dataset: &Path,
    artifact: &Path,
    config: &TrainingConfig,
) -> Result<TrainingOutcome, ClassifierError> {
    let examples = load_dataset(dataset, config)?;
    let outcome = Trainer::new(config.clone()).train(examples)?;
    outcome.artifact.save(artifact)?;
    Ok(outcome)
}
