use super::rolling::rolling_mean;

/// RSI (Relative Strength Index) indicator.
///
/// Average gain and average loss are simple rolling means of the last
/// `period` close-to-close changes, so the first value appears at index
/// `period` (the first bar has no change).
///
/// A window without losses has no defined RS. It resolves to 100 when there
/// were gains and to 50 when prices did not move at all.
#[derive(Debug, Clone, Copy)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub const DEFAULT_PERIOD: usize = 14;

    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// RSI aligned with `closes` (oldest first).
    pub fn series(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let mut gains = Vec::with_capacity(closes.len());
        let mut losses = Vec::with_capacity(closes.len());
        if !closes.is_empty() {
            gains.push(None);
            losses.push(None);
        }
        for w in closes.windows(2) {
            let change = w[1] - w[0];
            gains.push(Some(change.max(0.0)));
            losses.push(Some((-change).max(0.0)));
        }

        let avg_gain = rolling_mean(&gains, self.period);
        let avg_loss = rolling_mean(&losses, self.period);

        avg_gain
            .into_iter()
            .zip(avg_loss)
            .map(|(gain, loss)| Some(rsi_from_averages(gain?, loss?)))
            .collect()
    }

    /// RSI at the latest close. Returns `None` with fewer than `period + 1` values.
    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        self.series(closes).last().copied().flatten()
    }
}

impl Default for RsiIndicator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
