//! Statistical utility functions.

use std::cmp::Ordering;

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Calculate the standard deviation of a slice.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Numerically stable softplus, `ln(1 + e^x)`.
///
/// Written as `max(x, 0) + ln(1 + e^-|x|)` so it neither overflows for
/// large `x` nor loses monotonicity.
pub fn softplus(x: f64) -> f64 {
    x.max(0.0) + (-x.abs()).exp().ln_1p()
}

/// Sort a copy of `values` ascending, NaN-tolerant.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Nearest-rank bounds trimming `alpha` of the mass from each tail.
///
/// Returns `(sorted[floor(alpha*n)], sorted[ceil((1-alpha)*n) - 1])`.
/// At most `floor(alpha*n)` values lie strictly below the lower bound and
/// at most as many strictly above the upper one, so the closed interval
/// holds at least `1 - 2*alpha` of the values. `sorted` must be ascending.
pub fn rank_bounds(sorted: &[f64], alpha: f64) -> Option<(f64, f64)> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let alpha = alpha.clamp(0.0, 0.5);
    let lo = ((alpha * n as f64).floor() as usize).min(n - 1);
    let hi = (((1.0 - alpha) * n as f64).ceil() as usize)
        .saturating_sub(1)
        .clamp(lo, n - 1);
    Some((sorted[lo], sorted[hi]))
}

/// Number of distinct values in an ascending slice.
pub fn count_distinct(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|w| w[1] != w[0]).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_calculates_correctly() {
        assert_relative_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-10);
        assert_relative_eq!(mean(&[10.0]), 10.0, epsilon = 1e-10);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn variance_calculates_correctly() {
        // Sample variance of [1, 2, 3, 4, 5] = 2.5
        assert_relative_eq!(variance(&[1.0, 2.0, 3.0, 4.0, 5.0]), 2.5, epsilon = 1e-10);
        assert!(variance(&[1.0]).is_nan());
        assert!(variance(&[]).is_nan());
    }

    #[test]
    fn std_dev_calculates_correctly() {
        assert_relative_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.138089935, epsilon = 1e-6);
    }

    #[test]
    fn softplus_matches_definition() {
        for &x in &[-5.0, -1.0, 0.0, 0.5, 3.0] {
            assert_relative_eq!(softplus(x), (1.0 + f64::exp(x)).ln(), epsilon = 1e-12);
        }
        assert_relative_eq!(softplus(0.0), std::f64::consts::LN_2, epsilon = 1e-12);
    }

    #[test]
    fn softplus_is_stable_at_extremes() {
        assert_eq!(softplus(1000.0), 1000.0);
        assert!(softplus(-1000.0) >= 0.0);
        assert!(softplus(-1000.0) < 1e-300);
    }

    #[test]
    fn rank_bounds_trim_tails() {
        let values: Vec<f64> = (1..=100).map(|i| i as f64).collect();
        let (lo, hi) = rank_bounds(&values, 0.025).unwrap();
        assert_eq!(lo, 3.0);
        assert_eq!(hi, 98.0);
    }

    #[test]
    fn rank_bounds_small_samples_keep_extremes() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(rank_bounds(&values, 0.025), Some((1.0, 3.0)));
        assert_eq!(rank_bounds(&[], 0.025), None);
    }

    #[test]
    fn count_distinct_counts_runs() {
        assert_eq!(count_distinct(&[1.0, 1.0, 2.0, 3.0, 3.0]), 3);
        assert_eq!(count_distinct(&[4.0]), 1);
        assert_eq!(count_distinct(&[]), 0);
    }
}
