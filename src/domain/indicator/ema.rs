//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first observation, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). No warmup: every point is valid from
//! index 0. This is the non-adjusted recurrence, not the SMA-seeded variant.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

/// Apply the EMA recurrence to a raw value sequence.
///
/// Shared by [`calculate_ema`] (over closes) and the MACD signal line
/// (over the MACD line itself). Caller guarantees `period >= 1` and a
/// non-empty input.
pub(crate) fn ema_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);
    for &v in &values[1..] {
        ema = v * k + ema * (1.0 - k);
        out.push(ema);
    }
    out
}

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> Result<IndicatorSeries, SigtraderError> {
    if period == 0 {
        return Err(SigtraderError::InvalidPeriod {
            indicator: "EMA".into(),
        });
    }
    if bars.is_empty() {
        return Err(SigtraderError::EmptyInput {
            operation: "EMA".into(),
        });
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let smoothed = ema_smooth(&closes, period);

    let values = bars
        .iter()
        .zip(smoothed)
        .map(|(bar, ema)| IndicatorPoint {
            date: bar.date,
            valid: true,
            value: IndicatorValue::Simple(ema),
        })
        .collect();

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Ema(period),
        values,
    })
}
