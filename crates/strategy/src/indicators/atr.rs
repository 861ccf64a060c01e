use common::Bar;

use super::rolling::rolling_mean;

/// Average True Range.
///
/// True range uses the previous bar's close, so the first bar has none.
/// ATR is the simple rolling mean of true range and is first defined at
/// index `period`.
#[derive(Debug, Clone, Copy)]
pub struct AtrIndicator {
    pub period: usize,
}

impl AtrIndicator {
    pub const DEFAULT_PERIOD: usize = 14;

    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// ATR aligned with `bars`.
    pub fn series(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        rolling_mean(&true_range(bars), self.period)
    }

    /// ATR at the last bar, `None` if it is not yet defined.
    pub fn compute(&self, bars: &[Bar]) -> Option<f64> {
        self.series(bars).last().copied().flatten()
    }
}

impl Default for AtrIndicator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

/// max(high - low, |high - prev_close|, |low - prev_close|) per bar.
pub fn true_range(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(bars.len());
    if bars.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(bars.windows(2).map(|w| {
        let (prev, bar) = (&w[0], &w[1]);
        let tr = (bar.high - bar.low)
            .max((bar.high - prev.close).abs())
            .max((bar.low - prev.close).abs());
        Some(tr)
    }));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_bars;

    #[test]
    fn true_range_covers_gaps() {
        // Gap up: prev close 10, bar range 12..13 -> TR = |13 - 10| = 3.
        let bars = test_bars(&[(10.5, 9.5, 10.0), (13.0, 12.0, 12.5)]);
        assert_eq!(true_range(&bars), vec![None, Some(3.0)]);
    }

    #[test]
    fn atr_undefined_until_period_true_ranges_exist() {
        let bars = test_bars(&[(11.0, 9.0, 10.0); 6]);
        let atr = AtrIndicator::new(3).series(&bars);
        assert!(atr[..3].iter().all(Option::is_none));
        assert_eq!(atr[3], Some(2.0));
        assert_eq!(atr[5], Some(2.0));
    }

    #[test]
    fn atr_of_flat_bars_is_exactly_zero() {
        let bars = test_bars(&[(7.0, 7.0, 7.0); 20]);
        let atr = AtrIndicator::default().series(&bars);
        assert!(atr[..AtrIndicator::DEFAULT_PERIOD].iter().all(Option::is_none));
        assert!(atr[AtrIndicator::DEFAULT_PERIOD..]
            .iter()
            .all(|v| *v == Some(0.0)));
    }

    #[test]
    fn compute_returns_last_value() {
        let bars = test_bars(&[(11.0, 9.0, 10.0); 5]);
        assert_eq!(AtrIndicator::new(2).compute(&bars), Some(2.0));
        assert_eq!(AtrIndicator::new(5).compute(&bars), None);
    }

    #[test]
    fn empty_window_has_no_atr() {
        assert!(AtrIndicator::default().series(&[]).is_empty());
        assert_eq!(AtrIndicator::default().compute(&[]), None);
    }
}
