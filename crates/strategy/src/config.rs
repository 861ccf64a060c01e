use serde::{Deserialize, Serialize};

use common::{Error, Result};

use crate::detectors::{BreakoutParams, EmaPullbackParams, MaCrossoverParams, RsiBollingerParams};

/// Detector parameter file (TOML). Every table and key is optional and falls
/// back to the standard defaults.
///
/// Example `config/strategies.toml`:
/// ```toml
/// [ma]
/// short = 10
/// long = 30
///
/// [rsi_bb]
/// rsi_low = 25.0
/// rsi_high = 75.0
///
/// [breakout]
/// buffer = 0.002
///
/// [ema]
/// period = 21
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub ma: MaCrossoverParams,
    pub rsi_bb: RsiBollingerParams,
    pub breakout: BreakoutParams,
    pub ema: EmaPullbackParams,
}

impl DetectorConfig {
    /// Load from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse strategy config at '{path}': {e}")))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
