//! Plain-text report adapter implementing ReportPort.
//!
//! Renders the backtest summary and the trade log as a text file.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SigtraderError;
use crate::domain::metrics::Metrics;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(symbol: &str, result: &BacktestResult, metrics: &Metrics) -> String {
        let mut out = String::new();
        let title = format!("Backtest Report: {}", symbol);
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(out, "{}", "=".repeat(title.len()));
        let _ = writeln!(out);
        let _ = writeln!(out, "Initial capital: ${:.2}", result.initial_capital);
        let _ = writeln!(out, "Final capital:   ${:.2}", result.final_capital);
        let _ = writeln!(out, "Total return:    {:.2}%", metrics.total_return * 100.0);
        let _ = writeln!(
            out,
            "Trades:          {} ({} round trips)",
            result.trades.len(),
            metrics.round_trips
        );
        let _ = writeln!(out, "Win rate:        {:.1}%", metrics.win_rate * 100.0);
        let _ = writeln!(out, "Avg profit:      {:.2}%", metrics.avg_profit * 100.0);

        if !result.trades.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{:<12} {:<5} {:>12} {:>10}", "date", "kind", "price", "profit");
            for trade in &result.trades {
                match trade.profit {
                    Some(profit) => {
                        let _ = writeln!(
                            out,
                            "{:<12} {:<5} {:>12.2} {:>9.2}%",
                            trade.date,
                            trade.kind,
                            trade.price,
                            profit * 100.0
                        );
                    }
                    None => {
                        let _ = writeln!(
                            out,
                            "{:<12} {:<5} {:>12.2} {:>10}",
                            trade.date, trade.kind, trade.price, ""
                        );
                    }
                }
            }
        }

        out
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        symbol: &str,
        result: &BacktestResult,
        metrics: &Metrics,
        output_path: &Path,
    ) -> Result<(), SigtraderError> {
        let content = Self::render(symbol, result, metrics);
        fs::write(output_path, content)?;
        Ok(())
    }
}
