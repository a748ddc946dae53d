use ndarray::Array1;

/// Index of the largest value; ties go to the lowest index.
pub(crate) fn argmax(values: &Array1<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Turns joint log-likelihoods into probabilities that sum to one.
pub(crate) fn softmax_log(values: &Array1<f64>) -> Array1<f64> {
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Array1::zeros(values.len());
    }
    let exp = values.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}
