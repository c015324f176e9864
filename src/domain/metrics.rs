//! Performance metrics over a backtest result.

use crate::domain::backtest::BacktestResult;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub round_trips: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub avg_profit: f64,
    pub best_profit: f64,
    pub worst_profit: f64,
}

impl Metrics {
    pub fn compute(result: &BacktestResult) -> Self {
        let total_return = if result.initial_capital > 0.0 {
            (result.final_capital - result.initial_capital) / result.initial_capital
        } else {
            0.0
        };

        let profits: Vec<f64> = result.trades.iter().filter_map(|t| t.profit).collect();

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut best_profit = 0.0_f64;
        let mut worst_profit = 0.0_f64;

        for &p in &profits {
            if p > 0.0 {
                trades_won += 1;
            } else if p < 0.0 {
                trades_lost += 1;
            } else {
                trades_breakeven += 1;
            }
            if p > best_profit {
                best_profit = p;
            }
            if p < worst_profit {
                worst_profit = p;
            }
        }

        let round_trips = profits.len();
        let win_rate = if round_trips > 0 {
            trades_won as f64 / round_trips as f64
        } else {
            0.0
        };
        let avg_profit = if round_trips > 0 {
            profits.iter().sum::<f64>() / round_trips as f64
        } else {
            0.0
        };

        Metrics {
            total_return,
            round_trips,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            avg_profit,
            best_profit,
            worst_profit,
        }
    }
}
