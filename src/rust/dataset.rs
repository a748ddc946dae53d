use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::classifier::DatasetError;
use crate::config::TrainingConfig;

/// One labeled question from the training dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub text: String,
    pub label: String,
}

impl TrainingExample {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

/// Reads the delimited dataset at `path`.
///
/// The file must have a header row naming `config.text_column` and
/// `config.label_column`; other columns are ignored. Rows keep file order.
///
/// # Errors
/// - `NotFound` if the file does not exist
/// - `MissingColumn` if a required column is absent from the header
/// - `EmptyField` if a row has a blank text or label
/// - `Empty` if there are no rows
/// - `Read` for any I/O or parse failure
pub fn load_dataset(path: &Path, config: &TrainingConfig) -> Result<Vec<TrainingExample>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    log::info!("Loading dataset from {:?}", path);

    let reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    read_examples(reader, config)
}

/// Same as [`load_dataset`] for an in-memory or streamed source.
pub fn load_dataset_from_reader<R: std::io::Read>(
    source: R,
    config: &TrainingConfig,
) -> Result<Vec<TrainingExample>, DatasetError> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);
    read_examples(reader, config)
}

fn read_examples<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    config: &TrainingConfig,
) -> Result<Vec<TrainingExample>, DatasetError> {
    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}') == name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
    };
    let text_idx = column(&config.text_column)?;
    let label_idx = column(&config.label_column)?;

    let mut examples = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        // Header is line 1
        let row = i + 2;
        let field = |idx: usize, name: &str| match record.get(idx) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(DatasetError::EmptyField {
                row,
                column: name.to_string(),
            }),
        };
        let text = field(text_idx, &config.text_column)?;
        let label = field(label_idx, &config.label_column)?;
        examples.push(TrainingExample { text, label });
    }

    if examples.is_empty() {
        return Err(DatasetError::Empty);
    }
    log::info!("Loaded {} examples", examples.len());
    Ok(examples)
}

/// Shuffles `examples` with a seeded RNG and splits off a holdout partition.
///
/// The holdout gets `ceil(len * test_size)` rows, capped so that the training
/// partition keeps at least one row. The same seed always yields the same split.
///
/// # Returns
/// A tuple `(train, holdout)`
pub fn train_test_split<T>(mut examples: Vec<T>, test_size: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let total = examples.len();
    let mut rng = StdRng::seed_from_u64(seed);
    examples.shuffle(&mut rng);

    let holdout_len = ((total as f64) * test_size.clamp(0.0, 1.0)).ceil() as usize;
    let holdout_len = holdout_len.min(total.saturating_sub(1));
    let holdout = examples.split_off(total - holdout_len);

    log::debug!(
        "Dataset split: {} training, {} holdout (seed {})",
        examples.len(),
        holdout.len(),
        seed
    );
    (examples, holdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TrainingConfig {
        TrainingConfig::default()
    }

    #[test]
    fn test_load_from_reader() {
        let data = "texto;etiqueta\n¿Cómo me registro?;registro\n¿Cómo cancelo?;cancelacion\n";
        let rows = load_dataset_from_reader(data.as_bytes(), &config()).unwrap();
        assert_eq!(
            rows,
            vec![
                TrainingExample::new("¿Cómo me registro?", "registro"),
                TrainingExample::new("¿Cómo cancelo?", "cancelacion"),
            ]
        );
    }

    #[test]
    fn test_extra_columns_and_order_are_tolerated() {
        let data = "id;etiqueta;texto\n1;precio;¿Cuánto cuesta?\n";
        let rows = load_dataset_from_reader(data.as_bytes(), &config()).unwrap();
        assert_eq!(rows, vec![TrainingExample::new("¿Cuánto cuesta?", "precio")]);
    }

    #[test]
    fn test_missing_column() {
        let data = "pregunta;etiqueta\nhola;saludo\n";
        let err = load_dataset_from_reader(data.as_bytes(), &config()).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "texto"));
    }

    #[test]
    fn test_empty_field_reports_row() {
        let data = "texto;etiqueta\nhola;saludo\nadios;\n";
        let err = load_dataset_from_reader(data.as_bytes(), &config()).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyField { row: 3, .. }));
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = load_dataset_from_reader("texto;etiqueta\n".as_bytes(), &config()).unwrap_err();
        assert!(matches!(err, DatasetError::Empty));
    }

    #[test]
    fn test_missing_file() {
        let err = load_dataset(Path::new("/definitely/not/here.csv"), &config()).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn test_custom_delimiter() {
        let cfg = TrainingConfig {
            delimiter: b',',
            ..TrainingConfig::default()
        };
        let rows = load_dataset_from_reader("texto,etiqueta\nhola,saludo\n".as_bytes(), &cfg).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, holdout) = train_test_split(items, 0.25, 42);
        assert_eq!(train.len(), 75);
        assert_eq!(holdout.len(), 25);

        let (train, holdout) = train_test_split((0..10).collect::<Vec<_>>(), 0.25, 42);
        assert_eq!((train.len(), holdout.len()), (7, 3));
    }

    #[test]
    fn test_split_is_reproducible() {
        let items: Vec<usize> = (0..40).collect();
        let a = train_test_split(items.clone(), 0.25, 42);
        let b = train_test_split(items.clone(), 0.25, 42);
        assert_eq!(a, b);
        let c = train_test_split(items, 0.25, 7);
        assert_ne!(a, c);
    }

    #[test]
    fn test_split_preserves_items_and_keeps_training_non_empty() {
        let (train, holdout) = train_test_split(vec![1], 0.25, 42);
        assert_eq!((train, holdout), (vec![1], vec![]));

        let (mut train, holdout) = train_test_split((0..9).collect::<Vec<_>>(), 0.5, 1);
        train.extend(holdout);
        train.sort();
        assert_eq!(train, (0..9).collect::<Vec<_>>());

        let (train, holdout) = train_test_split(Vec::<u8>::new(), 0.25, 42);
        assert!(train.is_empty() && holdout.is_empty());
    }
}
