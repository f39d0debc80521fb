use thiserror::Error;

/// Errors from statistical computations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatError {
    #[error("empty input")]
    EmptyInput,
    #[error("length mismatch: {left} vs {right} values")]
    LengthMismatch { left: usize, right: usize },
    #[error("zero variance, correlation undefined")]
    ZeroVariance,
}

/// Arithmetic mean. `None` on empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median: middle element for odd lengths, average of the two middle
/// elements for even lengths. Empty input is 0.0 by convention.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Pearson product-moment correlation coefficient in [-1, 1].
///
/// Zero variance in either sequence makes the coefficient undefined;
/// callers special-case that instead of propagating NaN (matrix
/// diagonals are 1.0 by convention, not computed).
pub fn pearson(a: &[f64], b: &[f64]) -> Result<f64, StatError> {
    if a.len() != b.len() {
        return Err(StatError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(StatError::EmptyInput);
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    if var_a == 0.0 || var_b == 0.0 {
        return Err(StatError::ZeroVariance);
    }
    Ok(cov / (var_a * var_b).sqrt())
}

/// Summary statistics for a data series.
#[derive(Debug, Clone)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl SeriesSummary {
    /// Compute summary statistics, filtering out non-finite values.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = vals.iter().sum::<f64>() / count as f64;
        let median = median(&vals);
        let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(SeriesSummary {
            count,
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }

    /// One-line readout for panel footers.
    pub fn inline(&self, label: &str) -> String {
        format!(
            "{}: n={}, min {:.2}, max {:.2}, mean {:.2}, median {:.2}, std {:.2}",
            label, self.count, self.min, self.max, self.mean, self.median, self.std_dev
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_of_values() {
        let m = mean(&[1.0, 2.0, 3.0]).unwrap();
        assert!((m - 2.0).abs() < 1e-9);
    }

    #[test]
    fn median_odd_count() {
        assert!((median(&[3.0, 1.0, 2.0]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn median_even_count() {
        assert!((median(&[4.0, 1.0, 3.0, 2.0]) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn median_empty_is_zero() {
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn median_single_value() {
        assert!((median(&[7.5]) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn pearson_positive_linear_transform() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 4.0, 6.0];
        let r = pearson(&a, &b).unwrap();
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_negative_linear_transform() {
        let a = [1.0, 2.0, 3.0];
        let b = [-2.0, -4.0, -6.0];
        let r = pearson(&a, &b).unwrap();
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn pearson_is_symmetric() {
        let a = [1.0, 4.0, 2.0, 8.0, 5.0];
        let b = [3.0, 1.0, 7.0, 2.0, 6.0];
        let ab = pearson(&a, &b).unwrap();
        let ba = pearson(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn pearson_zero_variance() {
        let a = [5.0, 5.0, 5.0];
        let b = [1.0, 2.0, 3.0];
        assert_eq!(pearson(&a, &b), Err(StatError::ZeroVariance));
        assert_eq!(pearson(&b, &a), Err(StatError::ZeroVariance));
    }

    #[test]
    fn pearson_length_mismatch() {
        let err = pearson(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, StatError::LengthMismatch { left: 1, right: 2 });
    }

    #[test]
    fn pearson_empty() {
        assert_eq!(pearson(&[], &[]), Err(StatError::EmptyInput));
    }

    #[test]
    fn summary_filters_non_finite() {
        let s = SeriesSummary::compute(&[1.0, f64::NAN, 3.0, f64::INFINITY]).unwrap();
        assert_eq!(s.count, 2);
        assert!((s.mean - 2.0).abs() < 1e-9);
        assert!((s.median - 2.0).abs() < 1e-9);
    }

    #[test]
    fn summary_of_all_nan_is_none() {
        assert!(SeriesSummary::compute(&[f64::NAN, f64::NAN]).is_none());
    }
}
