//! RSI (Relative Strength Index) indicator.
//!
//! Uses a plain rolling mean of gains/losses over the last `period` price
//! changes (not Wilder smoothing):
//!
//! RS = mean_gain / mean_loss; RSI = 100 - (100 / (1 + RS))
//! If mean_loss == 0: RSI = 100 ("all gains" policy, applied even when the
//! window is entirely flat).
//!
//! Warmup: the delta at t=0 is undefined and the rolling mean needs `period`
//! deltas, so the first `period` points are invalid.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> Result<IndicatorSeries, SigtraderError> {
    if period == 0 {
        return Err(SigtraderError::InvalidPeriod {
            indicator: "RSI".into(),
        });
    }
    if bars.is_empty() {
        return Err(SigtraderError::EmptyInput {
            operation: "RSI".into(),
        });
    }

    // gains[i-1] / losses[i-1] correspond to the change into bar i.
    let mut gains: Vec<f64> = Vec::with_capacity(bars.len().saturating_sub(1));
    let mut losses: Vec<f64> = Vec::with_capacity(bars.len().saturating_sub(1));
    for pair in bars.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i >= 1 {
            gain_sum += gains[i - 1];
            loss_sum += losses[i - 1];
        }
        if i > period {
            gain_sum -= gains[i - period - 1];
            loss_sum -= losses[i - period - 1];
        }

        if i < period {
            values.push(IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            });
            continue;
        }

        let mean_gain = gain_sum / period as f64;
        let mean_loss = loss_sum / period as f64;
        let rsi = if mean_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + mean_gain / mean_loss))
        };
        values.push(IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(rsi),
        });
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    })
}
