use common::{Action, Bar, TradeSignal};

use crate::config::DetectorConfig;
use crate::detectors::{Breakout, EmaPullback, MaCrossover, RsiBollinger};
use crate::Detector;

/// Majority vote over several detectors evaluated on the same window.
pub struct CombinedDetector {
    detectors: Vec<Box<dyn Detector>>,
}

impl CombinedDetector {
    pub fn new(detectors: Vec<Box<dyn Detector>>) -> Self {
        Self { detectors }
    }

    /// The four standard detectors built from `config`.
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(vec![
            Box::new(MaCrossover::new(config.ma)),
            Box::new(RsiBollinger::new(config.rsi_bb)),
            Box::new(Breakout::new(config.breakout)),
            Box::new(EmaPullback::new(config.ema)),
        ])
    }

    pub fn detectors(&self) -> &[Box<dyn Detector>] {
        &self.detectors
    }
}

impl Default for CombinedDetector {
    fn default() -> Self {
        Self::from_config(&DetectorConfig::default())
    }
}

impl Detector for CombinedDetector {
    fn name(&self) -> &str {
        "combo"
    }

    fn min_bars(&self) -> usize {
        self.detectors.iter().map(|d| d.min_bars()).min().unwrap_or(0)
    }

    fn evaluate(&self, bars: &[Bar]) -> Option<TradeSignal> {
        let signals: Vec<Option<TradeSignal>> =
            self.detectors.iter().map(|d| d.evaluate(bars)).collect();
        majority_vote(&signals)
    }
}

/// Combine detector outputs into one signal.
///
/// Only detectors that fired take part. The side with strictly more votes
/// wins; a tie, including no votes at all, is no signal. The resulting stop
/// and target are the means of every stop and target offered by the
/// participating signals, whichever side they voted for.
pub fn majority_vote(signals: &[Option<TradeSignal>]) -> Option<TradeSignal> {
    let fired: Vec<&TradeSignal> = signals.iter().flatten().collect();

    let buys = fired.iter().filter(|s| s.action == Action::Buy).count();
    let sells = fired.len() - buys;
    let action = match buys.cmp(&sells) {
        std::cmp::Ordering::Greater => Action::Buy,
        std::cmp::Ordering::Less => Action::Sell,
        std::cmp::Ordering::Equal => return None,
    };

    let stop = mean(fired.iter().filter_map(|s| s.stop));
    let target = mean(fired.iter().filter_map(|s| s.target));
    Some(TradeSignal::new(action, stop, target))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
