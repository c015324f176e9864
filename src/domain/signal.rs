//! Trading signal generation.
//!
//! Combines the MACD and RSI series into a tri-state signal per timestamp,
//! evaluated independently at each bar (no memory of prior signals):
//!
//! - Buy when MACD line > signal line AND RSI < oversold
//! - Sell when MACD line < signal line AND RSI > overbought
//! - Hold otherwise
//!
//! A tie (line == signal) satisfies neither comparison. Points still inside
//! an indicator's warmup window produce Hold, never a spurious Buy/Sell.
//! Both input series must cover the same dates; misalignment is a caller
//! error, not something patched over by an implicit join.

use chrono::NaiveDate;

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{IndicatorSeries, IndicatorValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub signal: Signal,
}

/// RSI thresholds gating the MACD crossover conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        SignalThresholds {
            oversold: 30.0,
            overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalCounts {
    pub buys: usize,
    pub sells: usize,
    pub holds: usize,
}

pub fn generate_signals(
    macd: &IndicatorSeries,
    rsi: &IndicatorSeries,
    thresholds: &SignalThresholds,
) -> Result<Vec<SignalPoint>, SigtraderError> {
    if macd.values.len() != rsi.values.len() {
        return Err(SigtraderError::Misaligned {
            detail: format!(
                "MACD has {} points, RSI has {}",
                macd.values.len(),
                rsi.values.len()
            ),
        });
    }

    let mut signals = Vec::with_capacity(macd.values.len());

    for (i, (m, r)) in macd.values.iter().zip(&rsi.values).enumerate() {
        if m.date != r.date {
            return Err(SigtraderError::Misaligned {
                detail: format!("date mismatch at index {}: {} vs {}", i, m.date, r.date),
            });
        }

        let signal = if !m.valid || !r.valid {
            Signal::Hold
        } else {
            match (&m.value, &r.value) {
                (IndicatorValue::Macd { line, signal, .. }, IndicatorValue::Simple(rsi_val)) => {
                    if line > signal && *rsi_val < thresholds.oversold {
                        Signal::Buy
                    } else if line < signal && *rsi_val > thresholds.overbought {
                        Signal::Sell
                    } else {
                        Signal::Hold
                    }
                }
                _ => {
                    return Err(SigtraderError::Misaligned {
                        detail: format!(
                            "expected MACD and simple RSI values, got {} and {}",
                            macd.indicator_type, rsi.indicator_type
                        ),
                    });
                }
            }
        };

        signals.push(SignalPoint {
            date: m.date,
            signal,
        });
    }

    Ok(signals)
}

/// Tally the signal distribution, for reporting.
pub fn signal_counts(signals: &[SignalPoint]) -> SignalCounts {
    let mut counts = SignalCounts::default();
    for point in signals {
        match point.signal {
            Signal::Buy => counts.buys += 1,
            Signal::Sell => counts.sells += 1,
            Signal::Hold => counts.holds += 1,
        }
    }
    counts
}
