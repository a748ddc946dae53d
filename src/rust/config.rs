use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::builder::DEFAULT_ALPHA;

/// Environment variable overriding the directory that holds the assistant's files
pub const HOME_ENV: &str = "FAQ_ASSISTANT_HOME";

pub const DEFAULT_DATASET_FILE: &str = "faq_dataset.csv";
pub const DEFAULT_ARTIFACT_FILE: &str = "modelo_faq.bin";
pub const DEFAULT_ANSWERS_FILE: &str = "faq_respuestas.json";

/// Settings for one training run.
///
/// The seed is part of the reproducibility contract: the same dataset and the
/// same settings always produce the same artifact contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of rows withheld for the diagnostic holdout evaluation
    pub test_size: f64,
    /// Seed for the train/holdout shuffle
    pub seed: u64,
    /// Additive smoothing for the naive Bayes model
    pub alpha: f64,
    /// Field delimiter of the dataset file
    pub delimiter: u8,
    /// Header name of the question column
    pub text_column: String,
    /// Header name of the label column
    pub label_column: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_size: 0.25,
            seed: 42,
            alpha: DEFAULT_ALPHA,
            delimiter: b';',
            text_column: "texto".to_string(),
            label_column: "etiqueta".to_string(),
        }
    }
}

/// File locations used by the trainer and the classifier service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantPaths {
    pub dataset: PathBuf,
    pub artifact: PathBuf,
    pub answers: PathBuf,
}

impl AssistantPaths {
    /// Paths to the default file names inside `base_dir`
    pub fn in_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        let base = base_dir.as_ref();
        Self {
            dataset: base.join(DEFAULT_DATASET_FILE),
            artifact: base.join(DEFAULT_ARTIFACT_FILE),
            answers: base.join(DEFAULT_ANSWERS_FILE),
        }
    }

    /// Paths inside the default base directory
    pub fn new_default() -> Self {
        Self::in_dir(Self::get_default_base_dir())
    }

    /// Returns the default base directory
    pub fn get_default_base_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(HOME_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }

        // 2. Working directory, where the original workflow keeps its files
        if let Ok(cwd) = env::current_dir() {
            return cwd;
        }

        // 3. Platform data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("faq-assistant");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("faq-assistant")
    }

    pub fn with_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset = path.into();
        self
    }

    pub fn with_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact = path.into();
        self
    }

    pub fn with_answers(mut self, path: impl Into<PathBuf>) -> Self {
        self.answers = path.into();
        self
    }
}

impl Default for AssistantPaths {
    fn default() -> Self {
        Self::new_default()
    }
}
