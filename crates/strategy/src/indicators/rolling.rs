//! Rolling-window statistics shared by the indicators.
//!
//! Every series is aligned one-to-one with its input. A position is `None`
//! until a full window of defined values is available.

/// Rolling arithmetic mean over `period` values.
///
/// A window containing any undefined value yields `None`.
pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    windows(values.len(), period)
        .map(|range| {
            let range = range?;
            let mut sum = 0.0;
            for v in &values[range] {
                sum += (*v)?;
            }
            Some(sum / period as f64)
        })
        .collect()
}

/// Simple moving average of a fully-defined series.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let defined: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    rolling_mean(&defined, period)
}

/// Rolling sample standard deviation (N-1 divisor) over `period` values.
///
/// Undefined for `period < 2`.
pub fn rolling_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period < 2 {
        return vec![None; values.len()];
    }
    windows(values.len(), period)
        .map(|range| {
            let window = &values[range?];
            let mean = window.iter().sum::<f64>() / period as f64;
            let sq = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            Some((sq / (period - 1) as f64).sqrt())
        })
        .collect()
}

/// Index range of the window ending at each position, `None` while the
/// window is incomplete or `period` is zero.
fn windows(len: usize, period: usize) -> impl Iterator<Item = Option<std::ops::Range<usize>>> {
    (0..len).map(move |i| {
        if period == 0 || i + 1 < period {
            None
        } else {
            Some(i + 1 - period..i + 1)
        }
    })
}
