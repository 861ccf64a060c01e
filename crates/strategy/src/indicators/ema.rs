/// Exponential Moving Average.
///
/// Seeded with the first close and recomputed over the whole window on every
/// call: ema[0] = close[0], ema[i] = a * close[i] + (1 - a) * ema[i-1], with
/// a = 2 / (period + 1). Defined from the first bar onward.
#[derive(Debug, Clone, Copy)]
pub struct EmaIndicator {
    pub period: usize,
}

impl EmaIndicator {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    pub fn alpha(&self) -> f64 {
        2.0 / (self.period as f64 + 1.0)
    }

    /// EMA aligned with `closes`.
    pub fn series(&self, closes: &[f64]) -> Vec<f64> {
        let alpha = self.alpha();
        let mut out = Vec::with_capacity(closes.len());
        let mut prev: Option<f64> = None;
        for &close in closes {
            let next = match prev {
                None => close,
                Some(p) => alpha * close + (1.0 - alpha) * p,
            };
            out.push(next);
            prev = Some(next);
        }
        out
    }

    pub fn compute(&self, closes: &[f64]) -> Option<f64> {
        self.series(closes).last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_starts_at_first_close() {
        let ema = EmaIndicator::new(20).series(&[42.0, 42.0]);
        assert_eq!(ema, vec![42.0, 42.0]);
    }

    #[test]
    fn ema_follows_recurrence() {
        // period 3 -> alpha 0.5
        let ema = EmaIndicator::new(3).series(&[10.0, 20.0, 30.0]);
        assert_eq!(ema, vec![10.0, 15.0, 22.5]);
    }

    #[test]
    fn ema_of_empty_window_is_none() {
        assert_eq!(EmaIndicator::new(20).compute(&[]), None);
    }

    #[test]
    fn ema_is_recomputed_from_scratch() {
        let ema = EmaIndicator::new(5);
        let closes = [1.0, 4.0, 2.0, 8.0, 5.0];
        assert_eq!(ema.series(&closes), ema.series(&closes));
    }
}
