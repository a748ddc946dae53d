use std::collections::BTreeMap;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{NormalizedString, OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use super::error::ClassifierError;

/// Shortest token kept by the vectorizer, in characters.
const MIN_TOKEN_CHARS: usize = 2;

/// Converts free text into fixed-length numeric feature vectors.
///
/// Implementations own a frozen feature space: once fitted, `transform` never
/// grows it, whatever text comes in.
pub trait TextVectorizer {
    /// Number of columns in every vector this vectorizer produces
    fn num_features(&self) -> usize;

    /// Projects one text into the feature space.
    fn transform(&self, text: &str) -> Array1<f64>;

    /// Projects a batch of texts, one row per text.
    fn transform_batch<S: AsRef<str>>(&self, texts: &[S]) -> Array2<f64> {
        let mut matrix = Array2::zeros((texts.len(), self.num_features()));
        for (i, text) in texts.iter().enumerate() {
            matrix.row_mut(i).assign(&self.transform(text.as_ref()));
        }
        matrix
    }
}

/// Bag-of-words term counts over a vocabulary learned at fit time.
///
/// Text is NFC-normalized, lowercased and split into word and punctuation runs; only runs of
/// at least two word characters become terms. Vocabulary columns follow the
/// alphabetical order of the terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountVectorizer {
    vocabulary: BTreeMap<String, usize>,
}

impl CountVectorizer {
    /// Learns the vocabulary from `texts`.
    ///
    /// # Errors
    /// - `Training` if no text yields a single term
    pub fn fit<S: AsRef<str>>(texts: &[S]) -> Result<Self, ClassifierError> {
        let mut terms: BTreeMap<String, usize> = BTreeMap::new();
        for text in texts {
            for token in tokenize(text.as_ref()) {
                terms.entry(token).or_insert(0);
            }
        }
        if terms.is_empty() {
            return Err(ClassifierError::Training(
                "Training texts produced an empty vocabulary".into(),
            ));
        }
        for (index, column) in terms.values_mut().enumerate() {
            *column = index;
        }
        log::debug!("Vocabulary fitted with {} terms", terms.len());
        Ok(Self { vocabulary: terms })
    }

    /// Fits the vocabulary and returns the count matrix of the same texts.
    pub fn fit_transform<S: AsRef<str>>(texts: &[S]) -> Result<(Self, Array2<f64>), ClassifierError> {
        let vectorizer = Self::fit(texts)?;
        let matrix = vectorizer.transform_batch(texts);
        Ok((vectorizer, matrix))
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    /// Column of `term`, if it was seen during fitting
    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Checks that every term maps to a distinct column below `num_features`.
    pub fn check_columns(&self, num_features: usize) -> Result<(), String> {
        let mut seen = vec![false; num_features];
        for (term, &column) in &self.vocabulary {
            match seen.get_mut(column) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => return Err(format!("term '{}' reuses column {}", term, column)),
                None => {
                    return Err(format!(
                        "term '{}' maps to column {} but there are {} features",
                        term, column, num_features
                    ))
                }
            }
        }
        Ok(())
    }
}

impl TextVectorizer for CountVectorizer {
    fn num_features(&self) -> usize {
        self.vocabulary.len()
    }

    fn transform(&self, text: &str) -> Array1<f64> {
        let mut counts = Array1::zeros(self.vocabulary.len());
        for token in tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                counts[column] += 1.0;
            }
        }
        counts
    }
}

/// Splits text into lowercase terms.
///
/// Composed and decomposed spellings of the same word yield the same term.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut normalized = NormalizedString::from(text);
    normalized.nfc().lowercase();
    let lowered = normalized.get();
    let mut pretokenized = PreTokenizedString::from(lowered);
    if let Err(e) = Whitespace::default().pre_tokenize(&mut pretokenized) {
        log::warn!("Pre-tokenizer failed, falling back to a plain split: {}", e);
        return lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|t| is_term(t))
            .map(str::to_owned)
            .collect();
    }
    pretokenized
        .get_splits(OffsetReferential::Original, OffsetType::Byte)
        .into_iter()
        .map(|(piece, _, _)| piece)
        .filter(|piece| is_term(piece))
        .map(str::to_owned)
        .collect()
}

/// Word runs qualify; punctuation runs never contain an alphanumeric char.
/// Combining marks left after NFC count toward the length.
fn is_term(piece: &str) -> bool {
    piece.chars().count() >= MIN_TOKEN_CHARS && piece.chars().any(char::is_alphanumeric)
}
