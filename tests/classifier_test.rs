use faq_assistant::{
    train_from_path, AssistantPaths, ClassifierError, FaqService, ModelArtifact, ServiceState, TrainingConfig,
    FALLBACK_ANSWER,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Trains on the bundled dataset into a fresh directory and returns its paths
fn setup_trained_dir() -> Result<(TempDir, AssistantPaths), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let paths = AssistantPaths::in_dir(dir.path())
        .with_dataset(data_dir().join("faq_dataset.csv"))
        .with_answers(data_dir().join("faq_respuestas.json"));
    train_from_path(&paths.dataset, &paths.artifact, &TrainingConfig::default())?;
    Ok((dir, paths))
}

#[test]
fn test_end_to_end_classification() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, paths) = setup_trained_dir()?;
    let service = FaqService::new(paths);
    assert_eq!(service.state(), ServiceState::Uninitialized);

    let answer = service.classify("¿Cómo reservo una pista de pádel?")?;
    assert_eq!(service.state(), ServiceState::Ready);
    assert!(!answer.label.is_empty());
    assert!(!answer.answer.is_empty());
    Ok(())
}

#[test]
fn test_scenario_unmapped_label_uses_fallback() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let paths = AssistantPaths::in_dir(dir.path());
    fs::write(
        &paths.dataset,
        "texto;etiqueta\n¿Cómo me registro?;registro\n¿Cómo cancelo?;cancelacion\n",
    )?;
    fs::write(&paths.answers, r#"{"registro": "Visita la pestaña Registro…"}"#)?;

    let config = TrainingConfig {
        test_size: 0.0,
        ..TrainingConfig::default()
    };
    train_from_path(&paths.dataset, &paths.artifact, &config)?;

    let service = FaqService::new(paths);
    let answer = service.classify("¿Cómo cancelo mi cuenta?")?;
    assert_eq!(answer.label, "cancelacion");
    assert_eq!(answer.answer, FALLBACK_ANSWER);

    let answer = service.classify("¿Cómo me registro?")?;
    assert_eq!(answer.label, "registro");
    assert_eq!(answer.answer, "Visita la pestaña Registro…");
    Ok(())
}

#[test]
fn test_predictions_stay_within_training_labels() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, paths) = setup_trained_dir()?;
    let service = FaqService::new(paths);
    let labels = service.info()?.classifier.class_labels;

    let questions = [
        "",
        "    ",
        "zzzz qqqq wwww",
        "¿Cómo cancelo mi cuenta?",
        "¿Hay pistas libres el sábado?",
        "🎾🏀⚽",
        "RESERVAR RESERVAR RESERVAR",
    ];
    for question in questions {
        let answer = service.classify(question)?;
        assert!(labels.contains(&answer.label), "label {} not in training set", answer.label);
    }
    Ok(())
}

#[test]
fn test_classification_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, paths) = setup_trained_dir()?;
    let service = FaqService::new(paths);
    let first = service.classify("Quiero darme de baja")?;
    let second = service.classify("Quiero darme de baja")?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_saved_artifact_matches_training_predictions() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let artifact_path = dir.path().join("modelo_faq.bin");
    let outcome = train_from_path(
        &data_dir().join("faq_dataset.csv"),
        &artifact_path,
        &TrainingConfig::default(),
    )?;

    let loaded = ModelArtifact::load(&artifact_path)?;
    assert_eq!(loaded, outcome.artifact);

    let texts: Vec<&str> = outcome.holdout.iter().map(|e| e.text.as_str()).collect();
    let in_memory = outcome.artifact.classifier.predict_batch(&texts);
    let reloaded = loaded.classifier.predict_batch(&texts);
    assert_eq!(in_memory, reloaded);

    let report = outcome.report.expect("bundled dataset has a holdout");
    let correct = reloaded
        .iter()
        .zip(&outcome.holdout)
        .filter(|(predicted, example)| **predicted == example.label)
        .count();
    assert_eq!(correct as f64 / texts.len() as f64, report.accuracy);
    Ok(())
}

#[test]
fn test_retraining_overwrites_artifact() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, paths) = setup_trained_dir()?;
    let first = fs::read(&paths.artifact)?;
    train_from_path(&paths.dataset, &paths.artifact, &TrainingConfig::default())?;
    let second = fs::read(&paths.artifact)?;
    assert_eq!(first, second);

    let config = TrainingConfig {
        seed: 7,
        ..TrainingConfig::default()
    };
    train_from_path(&paths.dataset, &paths.artifact, &config)?;
    let reseeded = ModelArtifact::load(&paths.artifact)?;
    assert_eq!(reseeded.metadata.seed, 7);
    Ok(())
}

#[test]
fn test_service_thread_safety() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, paths) = setup_trained_dir()?;
    let service = Arc::new(FaqService::new(paths));
    let expected = service.classify("¿Cuánto cuesta el plan premium?")?;

    let mut handles = vec![];
    for _ in 0..4 {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            service.classify("¿Cuánto cuesta el plan premium?").unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    Ok(())
}

#[test]
fn test_concurrent_first_use_loads_once() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, paths) = setup_trained_dir()?;
    let service = Arc::new(FaqService::new(paths));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.classify("ver mis reservas").map(|a| a.label))
        })
        .collect();
    let labels: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect::<Result<_, ClassifierError>>()?;
    assert!(labels.windows(2).all(|w| w[0] == w[1]));
    assert!(service.is_ready());
    Ok(())
}
