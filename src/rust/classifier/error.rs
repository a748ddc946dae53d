use std::io;
use std::path::PathBuf;

/// Errors raised while reading the labeled training dataset.
///
/// Every variant is fatal to a training run: no artifact is written.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// The dataset file does not exist
    #[error("Dataset not found: {0}")]
    NotFound(PathBuf),
    /// The file exists but could not be read or parsed as delimited text
    #[error("Failed to read dataset: {0}")]
    Read(String),
    /// The header row lacks one of the required columns
    #[error("Dataset is missing required column '{0}'")]
    MissingColumn(String),
    /// A row has an empty value in a required column
    #[error("Row {row} has an empty '{column}' field")]
    EmptyField { row: usize, column: String },
    /// The dataset has a header but no rows
    #[error("Dataset contains no examples")]
    Empty,
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Read(err.to_string())
    }
}

/// Represents the different types of errors that can occur while training or serving the classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// Training input was missing or malformed
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    /// No artifact at the expected location
    #[error("Model artifact not found at {}. Run training first.", .0.display())]
    ArtifactNotFound(PathBuf),
    /// The artifact exists but cannot be decoded
    #[error("Model artifact is corrupt: {0}. Run training again.")]
    ArtifactCorrupt(String),
    /// The answer table is absent or not a JSON object of strings
    #[error("Answer table error: {0}")]
    AnswerTable(String),
    /// Fitting failed, e.g. no usable examples were supplied
    #[error("Training error: {0}")]
    Training(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ClassifierError {
    /// True for the errors an operator fixes by re-running the trainer.
    pub fn needs_retraining(&self) -> bool {
        matches!(self, Self::ArtifactNotFound(_) | Self::ArtifactCorrupt(_))
    }
}
