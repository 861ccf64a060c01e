use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use common::{Bar, Error, TradeSignal};

use crate::combined::CombinedDetector;
use crate::config::DetectorConfig;
use crate::detectors::{Breakout, EmaPullback, MaCrossover, RsiBollinger};
use crate::Detector;

/// Strategies selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    MaCrossover,
    RsiBollinger,
    Breakout,
    EmaPullback,
    Combined,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 5] = [
        StrategyKind::MaCrossover,
        StrategyKind::RsiBollinger,
        StrategyKind::Breakout,
        StrategyKind::EmaPullback,
        StrategyKind::Combined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::MaCrossover => "ma",
            StrategyKind::RsiBollinger => "rsi_bb",
            StrategyKind::Breakout => "breakout",
            StrategyKind::EmaPullback => "ema",
            StrategyKind::Combined => "combo",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| Error::Config(format!("Unknown strategy {s}")))
    }
}

/// Builds detectors from the loaded parameter file.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    config: DetectorConfig,
}

impl StrategyRegistry {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, kind: StrategyKind) -> Box<dyn Detector> {
        let detector: Box<dyn Detector> = match kind {
            StrategyKind::MaCrossover => Box::new(MaCrossover::new(self.config.ma)),
            StrategyKind::RsiBollinger => Box::new(RsiBollinger::new(self.config.rsi_bb)),
            StrategyKind::Breakout => Box::new(Breakout::new(self.config.breakout)),
            StrategyKind::EmaPullback => Box::new(EmaPullback::new(self.config.ema)),
            StrategyKind::Combined => Box::new(CombinedDetector::from_config(&self.config)),
        };
        debug!(name = %detector.name(), min_bars = detector.min_bars(), "Built detector");
        detector
    }

    /// Evaluate the `kind` strategy on `bars`.
    pub fn evaluate(&self, kind: StrategyKind, bars: &[Bar]) -> Option<TradeSignal> {
        let detector = self.build(kind);
        let signal = detector.evaluate(bars);
        match &signal {
            Some(s) => info!(
                strategy = %kind,
                bars = bars.len(),
                action = %s.action,
                stop = ?s.stop,
                target = ?s.target,
                "Signal generated"
            ),
            None => info!(strategy = %kind, bars = bars.len(), "No signal"),
        }
        signal
    }
}
