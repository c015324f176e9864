//! Bollinger Bands indicator.
//!
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the sample standard deviation (divides by N-1, ddof=1). The two
//! variants differ measurably on short windows; this one matches the
//! reference rolling std default.
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) points are invalid. With period=1 the sample
//! deviation is undefined (0/0), so every point is invalid.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_NUM_STD_X100: u32 = 200;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    num_std_x100: u32,
) -> Result<IndicatorSeries, SigtraderError> {
    if period == 0 {
        return Err(SigtraderError::InvalidPeriod {
            indicator: "BOLLINGER".into(),
        });
    }
    if bars.is_empty() {
        return Err(SigtraderError::EmptyInput {
            operation: "BOLLINGER".into(),
        });
    }

    let mult = num_std_x100 as f64 / 100.0;
    let warmup = period - 1;
    let mut values = Vec::with_capacity(bars.len());

    for i in 0..bars.len() {
        let valid = period > 1 && i >= warmup;

        let (upper, middle, lower) = if valid {
            let window = &bars[i + 1 - period..=i];
            let middle: f64 = window.iter().map(|b| b.close).sum::<f64>() / period as f64;
            let variance: f64 = window
                .iter()
                .map(|b| {
                    let diff = b.close - middle;
                    diff * diff
                })
                .sum::<f64>()
                / (period - 1) as f64;
            let stddev = variance.sqrt();
            (middle + mult * stddev, middle, middle - mult * stddev)
        } else {
            (0.0, 0.0, 0.0)
        };

        values.push(IndicatorPoint {
            date: bars[i].date,
            valid,
            value: IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            },
        });
    }

    Ok(IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            num_std_x100,
        },
        values,
    })
}
