use criterion::{black_box, criterion_group, criterion_main, Criterion};
use faq_assistant::{load_dataset, AnswerTable, FaqService, Trainer, TrainingConfig};
use std::path::Path;

fn setup_benchmark_service() -> FaqService {
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let config = TrainingConfig::default();
    let examples = load_dataset(&data.join("faq_dataset.csv"), &config).unwrap();
    let outcome = Trainer::new(config).train(examples).unwrap();
    let answers = AnswerTable::load(&data.join("faq_respuestas.json")).unwrap();
    FaqService::from_parts(outcome.artifact, answers)
}

fn bench_training(c: &mut Criterion) {
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let config = TrainingConfig::default();
    let examples = load_dataset(&data.join("faq_dataset.csv"), &config).unwrap();

    let mut group = c.benchmark_group("Training");
    group.sample_size(50);
    group.bench_function("bundled_dataset", |b| {
        b.iter(|| Trainer::new(config.clone()).train(black_box(examples.clone())).unwrap())
    });
    group.finish();
}

fn bench_classification(c: &mut Criterion) {
    let service = setup_benchmark_service();
    let mut group = c.benchmark_group("Classification");
    group.sample_size(100);
    group.warm_up_time(std::time::Duration::from_secs(1));

    group.bench_function("short_question", |b| {
        b.iter(|| service.classify(black_box("¿Cómo me registro?")).unwrap())
    });

    group.bench_function("long_question", |b| {
        b.iter(|| {
            service
                .classify(black_box(
                    "Hola, llevo un tiempo usando la aplicación para reservar pistas de pádel \
                     con mis amigos y me gustaría saber cuánto cuesta el plan premium, si hay \
                     descuentos para estudiantes y cómo puedo cancelar la suscripción más adelante.",
                ))
                .unwrap()
        })
    });

    group.bench_function("unseen_words", |b| {
        b.iter(|| service.classify(black_box("zzzz qqqq wwww")).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_training, bench_classification);
criterion_main!(benches);
