//! Backtest simulator.
//!
//! Two-state machine: Flat (no open position) and Long (one open position,
//! entry price remembered). Processing starts at the second bar, since
//! signals need preceding indicator history; the first bar is never acted on.
//!
//! - Flat + Buy: record a buy at the close, go Long. Buy while Long is
//!   ignored (no pyramiding).
//! - Long + Sell: profit = (exit - entry) / entry, capital *= 1 + profit,
//!   record a sell carrying the profit, go Flat. Sell while Flat is ignored
//!   (no shorting).
//!
//! An open Long at series end is not auto-liquidated: it contributes no
//! completed trade and no capital change. Capital only moves on realized
//! sells; unrealized mark-to-market never touches it.

use chrono::NaiveDate;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::signal::{Signal, SignalPoint};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Flat,
    Long { entry_price: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeKind::Buy => write!(f, "buy"),
            TradeKind::Sell => write!(f, "sell"),
        }
    }
}

/// One executed trade. `profit` is the fractional return since the paired
/// buy and is present only on sells.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub kind: TradeKind,
    pub date: NaiveDate,
    pub price: f64,
    pub profit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<TradeRecord>,
    pub initial_capital: f64,
    pub final_capital: f64,
}

pub fn run_backtest(
    bars: &[OhlcvBar],
    signals: &[SignalPoint],
    config: &BacktestConfig,
) -> Result<BacktestResult, SigtraderError> {
    if bars.len() != signals.len() {
        return Err(SigtraderError::Misaligned {
            detail: format!(
                "price series has {} bars, signal series has {}",
                bars.len(),
                signals.len()
            ),
        });
    }
    for (i, (bar, point)) in bars.iter().zip(signals).enumerate() {
        if bar.date != point.date {
            return Err(SigtraderError::Misaligned {
                detail: format!(
                    "date mismatch at index {}: {} vs {}",
                    i, bar.date, point.date
                ),
            });
        }
    }

    let mut position = Position::Flat;
    let mut capital = config.initial_capital;
    let mut trades = Vec::new();

    for i in 1..bars.len() {
        match (position, signals[i].signal) {
            (Position::Flat, Signal::Buy) => {
                let entry_price = bars[i].close;
                trades.push(TradeRecord {
                    kind: TradeKind::Buy,
                    date: bars[i].date,
                    price: entry_price,
                    profit: None,
                });
                position = Position::Long { entry_price };
            }
            (Position::Long { entry_price }, Signal::Sell) => {
                let exit_price = bars[i].close;
                let profit = (exit_price - entry_price) / entry_price;
                capital *= 1.0 + profit;
                trades.push(TradeRecord {
                    kind: TradeKind::Sell,
                    date: bars[i].date,
                    price: exit_price,
                    profit: Some(profit),
                });
                position = Position::Flat;
            }
            // Buy while Long, Sell while Flat, and Hold all leave state alone
            _ => {}
        }
    }

    Ok(BacktestResult {
        trades,
        initial_capital: config.initial_capital,
        final_capital: capital,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn make_bar(day: u32, close: f64) -> OhlcvBar {
        OhlcvBar {
            symbol: "TEST".into(),
            date: date(day),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        }
    }

    fn make_signals(signals: &[Signal]) -> Vec<SignalPoint> {
        signals
            .iter()
            .enumerate()
            .map(|(i, &signal)| SignalPoint {
                date: date((i + 1) as u32),
                signal,
            })
            .collect()
    }

    fn sample_config() -> BacktestConfig {
        BacktestConfig {
            start_date: date(1),
            end_date: date(28),
            initial_capital: 100_000.0,
        }
    }

    #[test]
    fn buy_then_sell_compounds_capital() {
        let bars: Vec<OhlcvBar> = [10.0, 10.0, 12.0, 12.0, 15.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar((i + 1) as u32, c))
            .collect();
        let signals = make_signals(&[
            Signal::Hold,
            Signal::Hold,
            Signal::Buy,
            Signal::Hold,
            Signal::Sell,
        ]);

        let result = run_backtest(&bars, &signals, &sample_config()).unwrap();

        assert_eq!(result.trades.len(), 2);
        assert_eq!(result.trades[0].kind, TradeKind::Buy);
        assert_eq!(result.trades[0].date, date(3));
        assert!((result.trades[0].price - 12.0).abs() < f64::EPSILON);
        assert!(result.trades[0].profit.is_none());

        assert_eq!(result.trades[1].kind, TradeKind::Sell);
        assert_eq!(result.trades[1].date, date(5));
        assert!((result.trades[1].price - 15.0).abs() < f64::EPSILON);
        let profit = result.trades[1].profit.unwrap();
        assert!((profit - 0.25).abs() < f64::EPSILON);

        assert!((result.final_capital - 125_000.0).abs() < 1e-6);
    }

    #[test]
    fn all_hold_leaves_capital_untouched() {
        let bars: Vec<OhlcvBar> = (1..=5).map(|i| make_bar(i, 100.0 + i as f64)).collect();
        let signals = make_signals(&[Signal::Hold; 5]);

        let result = run_backtest(&bars, &signals, &sample_config()).unwrap();

        assert!(result.trades.is_empty());
        assert!((result.final_capital - 100_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn first_bar_signal_is_never_acted_on() {
        let bars: Vec<OhlcvBar> = (1..=3).map(|i| make_bar(i, 100.0)).collect();
        let signals = make_signals(&[Signal::Buy, Signal::Hold, Signal::Hold]);

        let result = run_backtest(&bars, &signals, &sample_config()).unwrap();
        assert!(result.trades.is_empty());
    }

    #[test]
    fn buy_while_long_is_ignored() {
        let bars: Vec<OhlcvBar> = (1..=4).map(|i| make_bar(i, 100.0 + i as f64)).collect();
        let signals = make_signals(&[Signal::Hold, Signal::Buy, Signal::Buy, Signal::Buy]);

        let result = run_backtest(&bars, &signals, &sample_config()).unwrap();

        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].kind, TradeKind::Buy);
        assert_eq!(result.trades[0].date, date(2));
    }

    #[test]
    fn sell_while_flat_is_ignored() {
        let bars: Vec<OhlcvBar> = (1..=4).map(|i| make_bar(i, 100.0)).collect();
        let signals = make_signals(&[Signal::Hold, Signal::Sell, Signal::Sell, Signal::Hold]);

        let result = run_backtest(&bars, &signals, &sample_config()).unwrap();

        assert!(result.trades.is_empty());
        assert!((result.final_capital - 100_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn open_position_at_end_is_not_liquidated() {
        let bars: Vec<OhlcvBar> = (1..=3).map(|i| make_bar(i, 100.0 + i as f64 * 10.0)).collect();
        let signals = make_signals(&[Signal::Hold, Signal::Buy, Signal::Hold]);

        let result = run_backtest(&bars, &signals, &sample_config()).unwrap();

        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].kind, TradeKind::Buy);
        assert!((result.final_capital - 100_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trades_alternate_buy_sell() {
        let bars: Vec<OhlcvBar> = (1..=8).map(|i| make_bar(i, 100.0 + i as f64)).collect();
        let signals = make_signals(&[
            Signal::Hold,
            Signal::Buy,
            Signal::Sell,
            Signal::Sell,
            Signal::Buy,
            Signal::Buy,
            Signal::Sell,
            Signal::Hold,
        ]);

        let result = run_backtest(&bars, &signals, &sample_config()).unwrap();

        assert_eq!(result.trades.len(), 4);
        for (i, trade) in result.trades.iter().enumerate() {
            let expected = if i % 2 == 0 {
                TradeKind::Buy
            } else {
                TradeKind::Sell
            };
            assert_eq!(trade.kind, expected);
        }
    }

    #[test]
    fn sequential_round_trips_compound() {
        let closes = [100.0, 100.0, 110.0, 110.0, 121.0];
        let bars: Vec<OhlcvBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar((i + 1) as u32, c))
            .collect();
        let signals = make_signals(&[
            Signal::Hold,
            Signal::Buy,
            Signal::Sell,
            Signal::Buy,
            Signal::Sell,
        ]);

        let result = run_backtest(&bars, &signals, &sample_config()).unwrap();

        assert_eq!(result.trades.len(), 4);
        // 100 -> 110 is +10%, 110 -> 121 is +10%: 100000 * 1.1 * 1.1
        assert!((result.final_capital - 121_000.0).abs() < 1e-6);
    }

    #[test]
    fn losing_trade_shrinks_capital() {
        let bars: Vec<OhlcvBar> = [100.0, 100.0, 80.0]
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar((i + 1) as u32, c))
            .collect();
        let signals = make_signals(&[Signal::Hold, Signal::Buy, Signal::Sell]);

        let result = run_backtest(&bars, &signals, &sample_config()).unwrap();

        let profit = result.trades[1].profit.unwrap();
        assert!((profit - (-0.2)).abs() < f64::EPSILON);
        assert!((result.final_capital - 80_000.0).abs() < 1e-6);
    }

    #[test]
    fn empty_aligned_input_is_valid() {
        let result = run_backtest(&[], &[], &sample_config()).unwrap();
        assert!(result.trades.is_empty());
        assert!((result.final_capital - 100_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn length_mismatch_is_error() {
        let bars = vec![make_bar(1, 100.0)];
        let err = run_backtest(&bars, &[], &sample_config()).unwrap_err();
        assert!(matches!(err, SigtraderError::Misaligned { .. }));
    }

    #[test]
    fn date_mismatch_is_error() {
        let bars = vec![make_bar(1, 100.0), make_bar(2, 101.0)];
        let mut signals = make_signals(&[Signal::Hold, Signal::Hold]);
        signals[1].date = date(5);

        let err = run_backtest(&bars, &signals, &sample_config()).unwrap_err();
        assert!(matches!(err, SigtraderError::Misaligned { .. }));
    }

    #[test]
    fn rerun_is_deterministic() {
        let bars: Vec<OhlcvBar> = (1..=6).map(|i| make_bar(i, 90.0 + i as f64 * 3.0)).collect();
        let signals = make_signals(&[
            Signal::Hold,
            Signal::Buy,
            Signal::Hold,
            Signal::Sell,
            Signal::Buy,
            Signal::Hold,
        ]);

        let a = run_backtest(&bars, &signals, &sample_config()).unwrap();
        let b = run_backtest(&bars, &signals, &sample_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn trade_kind_display() {
        assert_eq!(TradeKind::Buy.to_string(), "buy");
        assert_eq!(TradeKind::Sell.to_string(), "sell");
    }
}
