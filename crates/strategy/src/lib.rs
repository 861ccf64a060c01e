pub mod combined;
pub mod config;
pub mod detectors;
pub mod indicators;
pub mod registry;

pub use combined::{majority_vote, CombinedDetector};
pub use config::DetectorConfig;
pub use detectors::{Breakout, EmaPullback, MaCrossover, RsiBollinger};
pub use registry::{StrategyKind, StrategyRegistry};

use common::{Bar, TradeSignal};

/// All signal detectors must satisfy this trait.
///
/// Detectors are pure: `evaluate` only reads the window and keeps no state
/// between calls, so one instance can be shared across threads and invoked
/// on independent windows concurrently.
pub trait Detector: Send + Sync {
    /// Short identifier used in logs and on the command line.
    fn name(&self) -> &str;

    /// Fewest bars with which the detector can ever fire.
    fn min_bars(&self) -> usize;

    /// Evaluate the window (oldest bar first) at its last bar.
    ///
    /// Returns `None` whenever no actionable signal is present, including
    /// every case of insufficient history.
    fn evaluate(&self, bars: &[Bar]) -> Option<TradeSignal>;
}
