use serde::{Deserialize, Serialize};

use common::{Action, Bar, TradeSignal};

use super::crossing;
use crate::indicators::{closes, AtrIndicator, EmaIndicator};
use crate::Detector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaPullbackParams {
    pub period: usize,
    pub atr_period: usize,
}

impl Default for EmaPullbackParams {
    fn default() -> Self {
        Self {
            period: 20,
            atr_period: AtrIndicator::DEFAULT_PERIOD,
        }
    }
}

/// Close crossing its EMA. Stop one ATR beyond the EMA.
#[derive(Debug, Clone, Default)]
pub struct EmaPullback {
    params: EmaPullbackParams,
}

impl EmaPullback {
    pub fn new(params: EmaPullbackParams) -> Self {
        Self { params }
    }
}

impl Detector for EmaPullback {
    fn name(&self) -> &str {
        "ema"
    }

    fn min_bars(&self) -> usize {
        self.params.period + 2
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<TradeSignal> {
        if bars.len() < self.min_bars() {
            return None;
        }

        let closes = closes(bars);
        let ema = EmaIndicator::new(self.params.period).series(&closes);
        let n = closes.len();

        let action = crossing(closes[n - 2], ema[n - 2], closes[n - 1], ema[n - 1])?;
        let atr = AtrIndicator::new(self.params.atr_period).compute(bars);
        let level = ema[n - 1];
        let stop = match action {
            Action::Buy => atr.map(|a| level - a),
            Action::Sell => atr.map(|a| level + a),
        };
        Some(TradeSignal::new(action, stop, None))
    }
}
