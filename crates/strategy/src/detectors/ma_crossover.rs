use serde::{Deserialize, Serialize};

use common::{Bar, TradeSignal};

use super::crossing;
use crate::indicators::{closes, sma};
use crate::Detector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaCrossoverParams {
    /// Short simple moving average period.
    pub short: usize,
    /// Long simple moving average period.
    pub long: usize,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        Self { short: 20, long: 50 }
    }
}

/// Short/long simple moving average crossover.
///
/// Buys on the bar where the short MA moves above the long MA and sells on
/// the mirror cross. The suggested stop is the current long MA.
#[derive(Debug, Clone, Default)]
pub struct MaCrossover {
    params: MaCrossoverParams,
}

impl MaCrossover {
    pub fn new(params: MaCrossoverParams) -> Self {
        Self { params }
    }
}

impl Detector for MaCrossover {
    fn name(&self) -> &str {
        "ma"
    }

    fn min_bars(&self) -> usize {
        (self.params.long.max(self.params.short) + 1).max(2)
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<TradeSignal> {
        if bars.len() < self.min_bars() {
            return None;
        }

        let closes = closes(bars);
        let short = sma(&closes, self.params.short);
        let long = sma(&closes, self.params.long);

        let n = bars.len();
        let (prev_short, prev_long) = (short[n - 2]?, long[n - 2]?);
        let (curr_short, curr_long) = (short[n - 1]?, long[n - 1]?);

        let action = crossing(prev_short, prev_long, curr_short, curr_long)?;
        Some(TradeSignal::new(action, Some(curr_long), None))
    }
}
