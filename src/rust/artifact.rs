use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::classifier::{Classifier, ClassifierError};

/// First bytes of every artifact file
const MAGIC: &[u8; 8] = b"FAQMODL1";
const HASH_LEN: usize = 32;

/// Facts about the training run that produced an artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// Crate version that wrote the artifact
    pub crate_version: String,
    pub seed: u64,
    pub train_size: usize,
    pub holdout_size: usize,
    /// Holdout accuracy, if there was a holdout
    pub holdout_accuracy: Option<f64>,
}

/// The persisted, fitted classifier.
///
/// On disk: the magic bytes, the SHA-256 of the payload, then the bincode
/// payload. A file that fails any of those checks is reported as corrupt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub classifier: Classifier,
    pub metadata: ArtifactMetadata,
}

fn sha256(bytes: &[u8]) -> [u8; HASH_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut digest = [0u8; HASH_LEN];
    digest.copy_from_slice(&hasher.finalize());
    digest
}

impl ModelArtifact {
    pub fn new(classifier: Classifier, metadata: ArtifactMetadata) -> Self {
        Self { classifier, metadata }
    }

    /// Encodes the artifact into its file representation.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ClassifierError> {
        let payload = bincode::serialize(self)
            .map_err(|e| ClassifierError::Training(format!("Failed to serialize artifact: {}", e)))?;
        let mut bytes = Vec::with_capacity(MAGIC.len() + HASH_LEN + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&sha256(&payload));
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decodes an artifact, checking magic bytes and checksum first.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClassifierError> {
        if bytes.len() < MAGIC.len() + HASH_LEN {
            return Err(ClassifierError::ArtifactCorrupt(format!(
                "file is too short ({} bytes)",
                bytes.len()
            )));
        }
        let (magic, rest) = bytes.split_at(MAGIC.len());
        if magic != MAGIC {
            return Err(ClassifierError::ArtifactCorrupt("unrecognized file header".into()));
        }
        let (expected, payload) = rest.split_at(HASH_LEN);
        if sha256(payload).as_slice() != expected {
            return Err(ClassifierError::ArtifactCorrupt("checksum mismatch".into()));
        }
        let artifact: ModelArtifact = bincode::deserialize(payload)
            .map_err(|e| ClassifierError::ArtifactCorrupt(format!("failed to decode: {}", e)))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks that the vectorizer and model agree on the feature space.
    fn validate(&self) -> Result<(), ClassifierError> {
        let vocabulary = self.classifier.vectorizer().vocabulary().len();
        let features = self.classifier.model().num_features();
        if vocabulary != features {
            return Err(ClassifierError::ArtifactCorrupt(format!(
                "vocabulary has {} terms but model expects {} features",
                vocabulary, features
            )));
        }
        self.classifier
            .model()
            .check_shapes()
            .map_err(ClassifierError::ArtifactCorrupt)?;
        self.classifier
            .vectorizer()
            .check_columns(features)
            .map_err(ClassifierError::ArtifactCorrupt)?;
        Ok(())
    }

    /// Writes the artifact to `path`, replacing any previous file.
    ///
    /// The bytes go to a temporary file in the same directory which is then
    /// renamed over `path`, so readers never observe a half-written artifact.
    pub fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        let bytes = self.to_bytes()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        let write = || -> io::Result<()> {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&tmp_path, path)
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        log::info!("Model artifact written to {:?} ({} bytes)", path, bytes.len());
        Ok(())
    }

    /// Reads the artifact at `path`.
    ///
    /// # Errors
    /// - `ArtifactNotFound` if there is no file at `path`
    /// - `ArtifactCorrupt` if the file cannot be decoded
    /// - `Io` for other read failures
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ClassifierError::ArtifactNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        log::info!("Read model artifact {:?} ({} bytes)", path, bytes.len());
        Self::from_bytes(&bytes)
    }
}
