// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators drawn on the
// dashboard charts. Every function returns a series index-aligned with its
// input; positions without enough history are `None` rather than a number.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use serde::{Deserialize, Serialize};

pub use macd::{calculate_macd, MacdSeries};
pub use rsi::{calculate_rsi, rsi_zone, RsiZone};
pub use sma::calculate_sma;

fn default_sma_fast() -> usize {
    20
}

fn default_sma_slow() -> usize {
    50
}

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

/// Look-back lengths for every derived series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_sma_fast")]
    pub sma_fast: usize,
    #[serde(default = "default_sma_slow")]
    pub sma_slow: usize,
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_fast: default_sma_fast(),
            sma_slow: default_sma_slow(),
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
        }
    }
}

impl IndicatorParams {
    /// Every look-back must be at least one bar; a zero span would leave its
    /// column shorter than the price series.
    pub fn validate(&self) -> anyhow::Result<()> {
        let spans = [
            ("sma_fast", self.sma_fast),
            ("sma_slow", self.sma_slow),
            ("rsi_period", self.rsi_period),
            ("macd_fast", self.macd_fast),
            ("macd_slow", self.macd_slow),
            ("macd_signal", self.macd_signal),
        ];
        for (name, span) in spans {
            if span == 0 {
                anyhow::bail!("indicator span {name} must be at least 1");
            }
        }
        Ok(())
    }
}
