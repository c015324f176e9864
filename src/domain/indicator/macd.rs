//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9
//! The underlying EMAs are seeded with their first observation, so every
//! point is valid from index 0.
//!
//! fast < slow is conventional but not validated: swapping them produces a
//! sign-flipped, strategically meaningless MACD, not an error.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::ema::ema_smooth;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<IndicatorSeries, SigtraderError> {
    if fast == 0 || slow == 0 || signal_period == 0 {
        return Err(SigtraderError::InvalidPeriod {
            indicator: "MACD".into(),
        });
    }
    if bars.is_empty() {
        return Err(SigtraderError::EmptyInput {
            operation: "MACD".into(),
        });
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_smooth(&closes, fast);
    let ema_slow = ema_smooth(&closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_smooth(&macd_line, signal_period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let line = macd_line[i];
            let signal = signal_line[i];
            IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Macd {
                    line,
                    signal,
                    histogram: line - signal,
                },
            }
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Macd {
            fast,
            slow,
            signal: signal_period,
        },
        values,
    })
}

pub fn calculate_macd_default(bars: &[OhlcvBar]) -> Result<IndicatorSeries, SigtraderError> {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
