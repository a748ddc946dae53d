use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Precision, recall and F1 for one label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of holdout rows whose true label is this one
    pub support: usize,
}

/// Holdout evaluation of a trained classifier.
///
/// Purely diagnostic: nothing in the crate acts on these numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy: f64,
    pub per_label: BTreeMap<String, LabelMetrics>,
    pub macro_avg: LabelMetrics,
    pub weighted_avg: LabelMetrics,
    pub total: usize,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn f1(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

impl EvaluationReport {
    /// Compares true and predicted labels position by position.
    ///
    /// Labels appearing only in `predicted` still get a row (support 0).
    /// An empty input yields an all-zero report.
    pub fn from_predictions<A: AsRef<str>, B: AsRef<str>>(actual: &[A], predicted: &[B]) -> Self {
        let total = actual.len().min(predicted.len());

        let mut true_pos: BTreeMap<String, usize> = BTreeMap::new();
        let mut predicted_count: BTreeMap<String, usize> = BTreeMap::new();
        let mut support: BTreeMap<String, usize> = BTreeMap::new();
        let mut correct = 0;

        for (a, p) in actual.iter().zip(predicted).take(total) {
            let (a, p) = (a.as_ref(), p.as_ref());
            *support.entry(a.to_string()).or_default() += 1;
            *predicted_count.entry(p.to_string()).or_default() += 1;
            true_pos.entry(a.to_string()).or_default();
            true_pos.entry(p.to_string()).or_default();
            if a == p {
                correct += 1;
                *true_pos.entry(a.to_string()).or_default() += 1;
            }
        }

        let per_label: BTreeMap<String, LabelMetrics> = true_pos
            .iter()
            .map(|(label, &tp)| {
                let sup = support.get(label).copied().unwrap_or(0);
                let pred = predicted_count.get(label).copied().unwrap_or(0);
                let precision = ratio(tp, pred);
                let recall = ratio(tp, sup);
                let metrics = LabelMetrics {
                    precision,
                    recall,
                    f1: f1(precision, recall),
                    support: sup,
                };
                (label.clone(), metrics)
            })
            .collect();

        let n_labels = per_label.len().max(1) as f64;
        let macro_avg = LabelMetrics {
            precision: per_label.values().map(|m| m.precision).sum::<f64>() / n_labels,
            recall: per_label.values().map(|m| m.recall).sum::<f64>() / n_labels,
            f1: per_label.values().map(|m| m.f1).sum::<f64>() / n_labels,
            support: total,
        };

        let weight = |m: &LabelMetrics| ratio(m.support, total);
        let weighted_avg = LabelMetrics {
            precision: per_label.values().map(|m| m.precision * weight(m)).sum(),
            recall: per_label.values().map(|m| m.recall * weight(m)).sum(),
            f1: per_label.values().map(|m| m.f1 * weight(m)).sum(),
            support: total,
        };

        Self {
            accuracy: ratio(correct, total),
            per_label,
            macro_avg,
            weighted_avg,
            total,
        }
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .per_label
            .keys()
            .map(|l| l.chars().count())
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(12);

        writeln!(f, "ACCURACY: {:.2}", self.accuracy)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        let row = |f: &mut fmt::Formatter<'_>, name: &str, m: &LabelMetrics| {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, m.precision, m.recall, m.f1, m.support
            )
        };
        for (label, m) in &self.per_label {
            row(f, label, m)?;
        }
        writeln!(f)?;
        row(f, "macro avg", &self.macro_avg)?;
        row(f, "weighted avg", &self.weighted_avg)
    }
}
