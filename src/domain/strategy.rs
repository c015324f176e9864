//! Strategy parameter set.

use crate::domain::indicator::{bollinger, macd, rsi};
use crate::domain::signal::SignalThresholds;

/// All tunable indicator parameters for the MACD+RSI strategy, plus the
/// Bollinger settings used by the indicator table output.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParams {
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub rsi_period: usize,
    pub thresholds: SignalThresholds,
    pub bollinger_period: usize,
    pub bollinger_num_std_x100: u32,
}

impl Default for StrategyParams {
    fn default() -> Self {
        StrategyParams {
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            rsi_period: rsi::DEFAULT_PERIOD,
            thresholds: SignalThresholds::default(),
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_num_std_x100: bollinger::DEFAULT_NUM_STD_X100,
        }
    }
}
