use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use faq_assistant::{train_from_path, AssistantPaths, ClassifierError, FaqService, TrainingConfig};
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the dataset, artifact and answer files
    /// (defaults to $FAQ_ASSISTANT_HOME, then the working directory)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Path of the model artifact
    #[arg(long, global = true)]
    artifact: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit the classifier on a labeled dataset and write the artifact
    Train(TrainArgs),
    /// Answer a single question
    Ask(AskArgs),
    /// Answer questions read from stdin, one per line
    Chat(ServeArgs),
    /// Describe the trained model
    Info(ServeArgs),
}

#[derive(Args)]
struct TrainArgs {
    /// Path of the delimited dataset file
    #[arg(long)]
    dataset: Option<PathBuf>,
    /// Field delimiter of the dataset
    #[arg(long, default_value_t = ';')]
    delimiter: char,
    /// Name of the question column
    #[arg(long, default_value = "texto")]
    text_column: String,
    /// Name of the label column
    #[arg(long, default_value = "etiqueta")]
    label_column: String,
    /// Fraction of rows withheld for evaluation
    #[arg(long, default_value_t = 0.25)]
    test_size: f64,
    /// Seed for the train/holdout shuffle
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Additive smoothing for the naive Bayes model
    #[arg(long, default_value_t = 1.0)]
    alpha: f64,
}

#[derive(Args)]
struct ServeArgs {
    /// Path of the JSON answer table
    #[arg(long)]
    answers: Option<PathBuf>,
}

#[derive(Args)]
struct AskArgs {
    /// The question to classify
    question: String,
    #[command(flatten)]
    serve: ServeArgs,
    /// Also print the label probabilities
    #[arg(long)]
    scores: bool,
}

fn resolve_paths(cli: &Cli) -> AssistantPaths {
    let mut paths = match &cli.home {
        Some(home) => AssistantPaths::in_dir(home),
        None => AssistantPaths::new_default(),
    };
    if let Some(artifact) = &cli.artifact {
        paths = paths.with_artifact(artifact);
    }
    paths
}

fn run_train(paths: AssistantPaths, args: &TrainArgs) -> Result<()> {
    if !args.delimiter.is_ascii() {
        bail!("Delimiter must be a single ASCII character, got {:?}", args.delimiter);
    }
    let config = TrainingConfig {
        test_size: args.test_size,
        seed: args.seed,
        alpha: args.alpha,
        delimiter: args.delimiter as u8,
        text_column: args.text_column.clone(),
        label_column: args.label_column.clone(),
    };
    let paths = match &args.dataset {
        Some(dataset) => paths.with_dataset(dataset),
        None => paths,
    };

    let start = Instant::now();
    let outcome = train_from_path(&paths.dataset, &paths.artifact, &config)
        .with_context(|| format!("Training on {:?} failed", paths.dataset))?;

    match &outcome.report {
        Some(report) => println!("{}", report),
        None => println!("No holdout rows; evaluation skipped."),
    }
    println!("\nModel saved to {}", paths.artifact.display());
    info!("Training took {:.2?}", start.elapsed());
    Ok(())
}

fn service_for(paths: AssistantPaths, args: &ServeArgs) -> FaqService {
    let paths = match &args.answers {
        Some(answers) => paths.with_answers(answers),
        None => paths,
    };
    FaqService::new(paths)
}

/// Prints the remediation hint for errors an operator fixes by retraining.
/// Adds the remediation hint; the error itself is reported by `main`.
fn explain(err: &ClassifierError) {
    if err.needs_retraining() {
        eprintln!("Run `faq_assistant train` to create the model artifact.");
    }
}

fn run_ask(paths: AssistantPaths, args: &AskArgs) -> Result<()> {
    if args.question.trim().is_empty() {
        bail!("Write a question first.");
    }
    let service = service_for(paths, &args.serve);
    let answer = service.classify(&args.question).map_err(|e| {
        explain(&e);
        e
    })?;

    println!("Detected category: {}", answer.label);
    println!("{}", answer.answer);
    if args.scores {
        for (label, score) in service.classifier()?.scores(&args.question) {
            println!("  {}: {:.1}%", label, score * 100.0);
        }
    }
    Ok(())
}

fn run_chat(paths: AssistantPaths, args: &ServeArgs) -> Result<()> {
    let service = service_for(paths, args);
    service.warm_up().map_err(|e| {
        explain(&e);
        e
    })?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            eprintln!("Write a question first.");
        } else {
            let answer = service.classify(&line)?;
            writeln!(stdout, "[{}] {}", answer.label, answer.answer)?;
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn run_info(paths: AssistantPaths, args: &ServeArgs) -> Result<()> {
    let service = service_for(paths, args);
    let info = service.info().map_err(|e| {
        explain(&e);
        e
    })?;

    println!("Artifact: {}", service.paths().artifact.display());
    println!("Written by version {}", info.metadata.crate_version);
    println!(
        "Trained on {} examples, {} held out (seed {})",
        info.metadata.train_size, info.metadata.holdout_size, info.metadata.seed
    );
    if let Some(accuracy) = info.metadata.holdout_accuracy {
        println!("Holdout accuracy: {:.2}", accuracy);
    }
    println!("Vocabulary: {} terms", info.classifier.vocabulary_size);
    println!("Labels ({}): {}", info.classifier.num_classes, info.classifier.class_labels.join(", "));
    println!("Answers: {}", info.num_answers);
    if !info.unanswered_labels.is_empty() {
        println!("Labels using the fallback answer: {}", info.unanswered_labels.join(", "));
    }
    println!("Fallback answer: {}", info.fallback_answer);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let paths = resolve_paths(&cli);

    match &cli.command {
        Command::Train(args) => run_train(paths, args),
        Command::Ask(args) => run_ask(paths, args),
        Command::Chat(args) => run_chat(paths, args),
        Command::Info(args) => run_info(paths, args),
    }
}
