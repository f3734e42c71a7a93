//! Trailing window statistics over historical series.

use crate::utils::stats;

/// Summary of the window preceding a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStats {
    pub mean: f64,
    pub std_dev: f64,
}

/// Compute a trailing rolling mean that emits a value as soon as
/// `min_periods` observations are available.
///
/// With `min_periods = 1` this is the smoothed "trend" line drawn under
/// history: the first points average over whatever is available.
pub fn rolling_mean(series: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    rolling_apply(series, window, min_periods, stats::mean)
}

/// Compute a trailing rolling sample standard deviation.
pub fn rolling_std(series: &[f64], window: usize, min_periods: usize) -> Vec<f64> {
    rolling_apply(series, window, min_periods.max(2), stats::std_dev)
}

/// Statistics of the `window` points strictly before each index.
///
/// Entry `i` is `None` for `i < window`; the point itself never enters
/// its own baseline.
pub fn preceding_stats(series: &[f64], window: usize) -> Vec<Option<WindowStats>> {
    let n = series.len();
    if window == 0 {
        return vec![None; n];
    }

    (0..n)
        .map(|i| {
            if i < window {
                return None;
            }
            let segment = &series[i - window..i];
            let std_dev = if window < 2 || segment.iter().all(|&x| x == segment[0]) {
                0.0
            } else {
                stats::std_dev(segment)
            };
            Some(WindowStats {
                mean: stats::mean(segment),
                std_dev,
            })
        })
        .collect()
}

/// Generic trailing window application.
fn rolling_apply<F>(series: &[f64], window: usize, min_periods: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if series.is_empty() || window == 0 {
        return vec![f64::NAN; series.len()];
    }

    let min_periods = min_periods.clamp(1, window);
    let mut result = vec![f64::NAN; series.len()];

    for i in 0..series.len() {
        let start = (i + 1).saturating_sub(window);
        let segment = &series[start..=i];
        if segment.len() >= min_periods {
            result[i] = f(segment);
        }
    }

    result
}
