pub mod breakout;
pub mod ema_pullback;
pub mod ma_crossover;
pub mod rsi_bollinger;

pub use breakout::{Breakout, BreakoutParams};
pub use ema_pullback::{EmaPullback, EmaPullbackParams};
pub use ma_crossover::{MaCrossover, MaCrossoverParams};
pub use rsi_bollinger::{RsiBollinger, RsiBollingerParams};

use common::Action;

/// Edge-triggered crossing of series `a` over series `b` between the
/// previous and the current bar.
///
/// Fires only on the bar where the relation flips: `a` moving from at or
/// below `b` to strictly above is a buy, the mirror image a sell.
pub(crate) fn crossing(prev_a: f64, prev_b: f64, curr_a: f64, curr_b: f64) -> Option<Action> {
    if prev_a <= prev_b && curr_a > curr_b {
        Some(Action::Buy)
    } else if prev_a >= prev_b && curr_a < curr_b {
        Some(Action::Sell)
    } else {
        None
    }
}
