//! Pure indicator transforms over a bar window.
//!
//! Nothing here keeps state between calls or writes into its input: every
//! function borrows the window and returns a freshly derived series.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod rolling;
pub mod rsi;

pub use atr::{true_range, AtrIndicator};
pub use bollinger::{Bands, BollingerIndicator};
pub use ema::EmaIndicator;
pub use rolling::{rolling_mean, rolling_std, sma};
pub use rsi::RsiIndicator;

use common::Bar;

/// Close prices of a window, oldest first.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Build hourly bars from `(high, low, close)` triples for tests.
#[cfg(test)]
pub(crate) fn test_bars(hlc: &[(f64, f64, f64)]) -> Vec<Bar> {
    use chrono::{Duration, TimeZone, Utc};
    let base = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    hlc.iter()
        .enumerate()
        .map(|(i, &(high, low, close))| Bar::new(base + Duration::hours(i as i64), high, low, close))
        .collect()
}

/// Hourly bars with high = close + 1 and low = close - 1.
#[cfg(test)]
pub(crate) fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let hlc: Vec<(f64, f64, f64)> = closes.iter().map(|&c| (c + 1.0, c - 1.0, c)).collect();
    test_bars(&hlc)
}
