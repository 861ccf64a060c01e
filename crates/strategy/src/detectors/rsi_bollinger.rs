use serde::{Deserialize, Serialize};

use common::{Action, Bar, TradeSignal};

use crate::indicators::{closes, BollingerIndicator, RsiIndicator};
use crate::Detector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiBollingerParams {
    pub rsi_low: f64,
    pub rsi_high: f64,
    pub rsi_period: usize,
    /// Bollinger period.
    pub period: usize,
    /// Band width in standard deviations.
    pub width: f64,
}

impl Default for RsiBollingerParams {
    fn default() -> Self {
        Self {
            rsi_low: 30.0,
            rsi_high: 70.0,
            rsi_period: RsiIndicator::DEFAULT_PERIOD,
            period: BollingerIndicator::DEFAULT_PERIOD,
            width: BollingerIndicator::DEFAULT_WIDTH,
        }
    }
}

/// Mean reversion: oversold RSI below the lower band buys, overbought RSI
/// above the upper band sells. Stop at the band that was pierced, target at
/// the middle band.
#[derive(Debug, Clone, Default)]
pub struct RsiBollinger {
    params: RsiBollingerParams,
}

impl RsiBollinger {
    pub fn new(params: RsiBollingerParams) -> Self {
        Self { params }
    }
}

impl Detector for RsiBollinger {
    fn name(&self) -> &str {
        "rsi_bb"
    }

    fn min_bars(&self) -> usize {
        self.params.period.max(self.params.rsi_period + 1)
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<TradeSignal> {
        if bars.len() < self.min_bars() {
            return None;
        }

        let closes = closes(bars);
        let rsi = RsiIndicator::new(self.params.rsi_period).compute(&closes)?;
        let bands = BollingerIndicator::new(self.params.period, self.params.width).compute(&closes)?;
        let close = *closes.last()?;

        if rsi < self.params.rsi_low && close < bands.lower {
            return Some(TradeSignal::new(Action::Buy, Some(bands.lower), Some(bands.middle)));
        }
        if rsi > self.params.rsi_high && close > bands.upper {
            return Some(TradeSignal::new(Action::Sell, Some(bands.upper), Some(bands.middle)));
        }
        None
    }
}
