use std::collections::BTreeSet;

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{argmax, softmax_log};

/// Multinomial naive Bayes over term-count features.
///
/// Classes are stored in sorted order; prediction picks the class with the
/// highest joint log-likelihood, and ties go to the first class in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayes {
    alpha: f64,
    classes: Vec<String>,
    class_log_prior: Array1<f64>,
    /// One row per class, one column per feature
    feature_log_prob: Array2<f64>,
}

impl NaiveBayes {
    /// Fits the model on a count matrix with one label per row.
    ///
    /// # Errors
    /// - `Training` if there are no rows, if rows and labels disagree in length,
    ///   or if `alpha` is not a positive finite number
    pub fn fit(features: &Array2<f64>, labels: &[String], alpha: f64) -> Result<Self, ClassifierError> {
        if features.nrows() == 0 {
            return Err(ClassifierError::Training("Cannot fit on zero examples".into()));
        }
        if features.nrows() != labels.len() {
            return Err(ClassifierError::Training(format!(
                "Feature rows ({}) and labels ({}) differ in length",
                features.nrows(),
                labels.len()
            )));
        }
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(ClassifierError::Training(format!(
                "Smoothing alpha must be positive and finite, got {}",
                alpha
            )));
        }

        let classes: Vec<String> = labels.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        let n_features = features.ncols();

        let mut class_counts = Array1::<f64>::zeros(classes.len());
        let mut feature_counts = Array2::<f64>::zeros((classes.len(), n_features));
        for (row, label) in features.axis_iter(Axis(0)).zip(labels) {
            // classes was built from labels, so the search always hits
            let c = classes.binary_search(label).unwrap_or_default();
            class_counts[c] += 1.0;
            let mut counts = feature_counts.row_mut(c);
            counts += &row;
        }

        let total = class_counts.sum();
        let class_log_prior = class_counts.mapv(|n| (n / total).ln());

        let smoothed = feature_counts.mapv(|n| n + alpha);
        let row_totals = smoothed.sum_axis(Axis(1)).insert_axis(Axis(1));
        let feature_log_prob = smoothed.mapv(f64::ln) - row_totals.mapv(f64::ln);

        log::debug!(
            "Naive Bayes fitted: {} classes, {} features, {} examples",
            classes.len(),
            n_features,
            labels.len()
        );

        Ok(Self {
            alpha,
            classes,
            class_log_prior,
            feature_log_prob,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn num_features(&self) -> usize {
        self.feature_log_prob.ncols()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Checks that the class list, priors and feature table agree in shape.
    ///
    /// Decoded models skip `fit`, so nothing else guarantees this.
    pub fn check_shapes(&self) -> Result<(), String> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err("model has no classes".into());
        }
        if self.class_log_prior.len() != n_classes {
            return Err(format!(
                "model has {} classes but {} class priors",
                n_classes,
                self.class_log_prior.len()
            ));
        }
        if self.feature_log_prob.nrows() != n_classes {
            return Err(format!(
                "model has {} classes but {} feature rows",
                n_classes,
                self.feature_log_prob.nrows()
            ));
        }
        if self.classes.windows(2).any(|w| w[0] >= w[1]) {
            return Err("model classes are not sorted and unique".into());
        }
        Ok(())
    }

    /// Unnormalized log P(class) + log P(features | class) for every class.
    pub fn joint_log_likelihood(&self, features: &Array1<f64>) -> Array1<f64> {
        self.feature_log_prob.dot(features) + &self.class_log_prior
    }

    /// Posterior probability of each class, aligned with `classes()`.
    pub fn predict_proba(&self, features: &Array1<f64>) -> Array1<f64> {
        softmax_log(&self.joint_log_likelihood(features))
    }

    /// The single most likely class.
    pub fn predict(&self, features: &Array1<f64>) -> &str {
        let scores = self.joint_log_likelihood(features);
        // A fitted model has at least one class
        let best = argmax(&scores).unwrap_or(0);
        &self.classes[best]
    }
}
