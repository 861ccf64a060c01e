//! Bollinger Bands: moving average +/- a multiple of the rolling stddev.
//!
//! Uses sample stddev (divide by N-1). A flat window has zero stddev and the
//! three bands coincide.

use super::rolling::{rolling_std, sma};

/// Band values at one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct BollingerIndicator {
    pub period: usize,
    pub width: f64,
}

impl BollingerIndicator {
    pub const DEFAULT_PERIOD: usize = 20;
    pub const DEFAULT_WIDTH: f64 = 2.0;

    pub fn new(period: usize, width: f64) -> Self {
        Self { period, width }
    }

    /// Bands aligned with `closes`; `None` until `period` closes exist.
    pub fn series(&self, closes: &[f64]) -> Vec<Option<Bands>> {
        sma(closes, self.period)
            .into_iter()
            .zip(rolling_std(closes, self.period))
            .map(|(middle, std)| {
                let (middle, std) = (middle?, std?);
                Some(Bands {
                    upper: middle + self.width * std,
                    middle,
                    lower: middle - self.width * std,
                })
            })
            .collect()
    }

    pub fn compute(&self, closes: &[f64]) -> Option<Bands> {
        self.series(closes).last().copied().flatten()
    }
}

impl Default for BollingerIndicator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD, Self::DEFAULT_WIDTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_undefined_until_period_closes() {
        let closes: Vec<f64> = (0..19).map(|i| i as f64).collect();
        assert!(BollingerIndicator::default().compute(&closes).is_none());
    }

    #[test]
    fn bands_are_symmetric_around_middle() {
        let bands = BollingerIndicator::new(4, 2.0)
            .compute(&[1.0, 2.0, 3.0, 4.0])
            .unwrap();
        assert!((bands.middle - 2.5).abs() < 1e-12);
        let std = (5.0_f64 / 3.0).sqrt();
        assert!((bands.upper - (2.5 + 2.0 * std)).abs() < 1e-12);
        assert!((bands.lower - (2.5 - 2.0 * std)).abs() < 1e-12);
    }

    #[test]
    fn flat_window_collapses_bands() {
        let bands = BollingerIndicator::default().compute(&[100.0; 25]).unwrap();
        assert_eq!(
            bands,
            Bands {
                upper: 100.0,
                middle: 100.0,
                lower: 100.0
            }
        );
    }
}
