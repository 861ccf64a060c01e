use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use common::{Action, Bar, TradeSignal};

use crate::indicators::AtrIndicator;
use crate::Detector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutParams {
    /// Fraction the close must clear the range by (0.001 = 0.1%).
    pub buffer: f64,
    pub atr_period: usize,
    /// Stop distance in ATRs.
    pub stop_atr: f64,
    /// Target distance in ATRs.
    pub target_atr: f64,
}

impl Default for BreakoutParams {
    fn default() -> Self {
        Self {
            buffer: 0.001,
            atr_period: AtrIndicator::DEFAULT_PERIOD,
            stop_atr: 1.5,
            target_atr: 2.0,
        }
    }
}

/// Breakout of the prior calendar day's range.
///
/// Bars are grouped by the UTC date of their timestamp. The reference range
/// is the full high/low of the latest earlier date, widened by whatever the
/// current date has already traded before the evaluated bar. Stops and
/// targets are placed in ATR multiples from the close; they are left empty
/// while the window is too short for ATR.
#[derive(Debug, Clone, Default)]
pub struct Breakout {
    params: BreakoutParams,
}

impl Breakout {
    pub fn new(params: BreakoutParams) -> Self {
        Self { params }
    }
}

impl Detector for Breakout {
    fn name(&self) -> &str {
        "breakout"
    }

    fn min_bars(&self) -> usize {
        2
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<TradeSignal> {
        if bars.len() < self.min_bars() {
            return None;
        }

        let (last, earlier) = bars.split_last()?;
        let today = last.date();
        let prev_day = earlier.iter().map(Bar::date).filter(|d| *d < today).max()?;

        let (prev_high, prev_low) = day_range(earlier, prev_day)?;
        // Today's range excludes the evaluated bar; its own high caps its close.
        let (high_level, low_level) = match day_range(earlier, today) {
            Some((high, low)) => (high.max(prev_high), low.min(prev_low)),
            None => (prev_high, prev_low),
        };

        let close = last.close;
        let atr = AtrIndicator::new(self.params.atr_period).compute(bars);
        let BreakoutParams {
            buffer,
            stop_atr,
            target_atr,
            ..
        } = self.params;

        if close > high_level * (1.0 + buffer) {
            return Some(TradeSignal::new(
                Action::Buy,
                atr.map(|a| close - stop_atr * a),
                atr.map(|a| close + target_atr * a),
            ));
        }
        if close < low_level * (1.0 - buffer) {
            return Some(TradeSignal::new(
                Action::Sell,
                atr.map(|a| close + stop_atr * a),
                atr.map(|a| close - target_atr * a),
            ));
        }
        None
    }
}

/// Highest high and lowest low over all bars dated `date`.
fn day_range(bars: &[Bar], date: NaiveDate) -> Option<(f64, f64)> {
    bars.iter()
        .filter(|b| b.date() == date)
        .fold(None, |acc, b| match acc {
            None => Some((b.high, b.low)),
            Some((high, low)) => Some((b.high.max(high), b.low.min(low))),
        })
}
