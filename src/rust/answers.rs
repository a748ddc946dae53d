use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use crate::classifier::ClassifierError;

/// Answer returned for labels the table does not cover
pub const FALLBACK_ANSWER: &str = "No tengo esa respuesta todavía. Prueba a reformular la pregunta.";

/// Canned answers keyed by label.
///
/// Lookup never fails: a label without an entry resolves to the fallback text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerTable {
    answers: HashMap<String, String>,
    fallback: String,
}

impl Default for AnswerTable {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

impl AnswerTable {
    pub fn new(answers: HashMap<String, String>) -> Self {
        Self {
            answers,
            fallback: FALLBACK_ANSWER.to_string(),
        }
    }

    /// Replaces the fallback text
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Parses a JSON object mapping labels to answers
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let answers: HashMap<String, String> = serde_json::from_str(json)
            .map_err(|e| ClassifierError::AnswerTable(format!("expected a JSON object of strings: {}", e)))?;
        Ok(Self::new(answers))
    }

    /// Reads the answer table from a UTF-8 JSON file
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let json = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                ClassifierError::AnswerTable(format!("answer file not found: {}", path.display()))
            }
            _ => ClassifierError::AnswerTable(format!("failed to read {}: {}", path.display(), e)),
        })?;
        let table = Self::from_json(&json)?;
        log::info!("Loaded {} answers from {:?}", table.len(), path);
        Ok(table)
    }

    /// Answer for `label`, or the fallback text
    pub fn lookup(&self, label: &str) -> &str {
        self.answers.get(label).map(String::as_str).unwrap_or(&self.fallback)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.answers.contains_key(label)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Labels that have an answer, sorted
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.answers.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_with_fallback() {
        let table = AnswerTable::from_json(r#"{"registro": "Visita la pestaña Registro."}"#).unwrap();
        assert_eq!(table.lookup("registro"), "Visita la pestaña Registro.");
        assert_eq!(table.lookup("cancelacion"), FALLBACK_ANSWER);
        assert!(!table.contains("cancelacion"));
    }

    #[test]
    fn test_custom_fallback() {
        let table = AnswerTable::default().with_fallback("Sin respuesta");
        assert_eq!(table.lookup("anything"), "Sin respuesta");
        assert_eq!(table.fallback(), "Sin respuesta");
        assert!(table.is_empty());
    }

    #[test]
    fn test_rejects_non_string_values() {
        let err = AnswerTable::from_json(r#"{"registro": 3}"#).unwrap_err();
        assert!(matches!(err, ClassifierError::AnswerTable(_)));
        assert!(AnswerTable::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnswerTable::load(Path::new("/no/such/answers.json")).unwrap_err();
        assert!(matches!(err, ClassifierError::AnswerTable(_)));
    }

    #[test]
    fn test_load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("faq_respuestas.json");
        fs::write(&path, r#"{"precio": "La cuota es de 30€", "horario": "De 7 a 23h"}"#)?;
        let table = AnswerTable::load(&path)?;
        assert_eq!(table.labels(), vec!["horario", "precio"]);
        Ok(())
    }
}
