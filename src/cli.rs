//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report_adapter::TextReportAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, DEFAULT_INITIAL_CAPITAL};
use crate::domain::config_validation::{validate_backtest_config, validate_strategy_config};
use crate::domain::error::SigtraderError;
use crate::domain::indicator::{calculate_bollinger, calculate_macd, calculate_rsi, IndicatorValue};
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::validate_series;
use crate::domain::signal::{generate_signals, signal_counts, SignalThresholds};
use crate::domain::strategy::StrategyParams;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "sigtrader", about = "Technical indicator strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and write per-symbol reports
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Export the computed indicator table as CSV
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// List symbols with quote files in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for configured symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbol,
            output_dir,
        } => run_backtest_cmd(&config, symbol.as_deref(), output_dir.as_deref()),
        Command::Indicators {
            config,
            symbol,
            output_dir,
        } => run_indicators_cmd(&config, symbol.as_deref(), output_dir.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SigtraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, SigtraderError> {
    let start_str = adapter
        .get_string("backtest", "start_date")
        .ok_or_else(|| SigtraderError::ConfigMissing {
            section: "backtest".into(),
            key: "start_date".into(),
        })?;
    let end_str = adapter.get_string("backtest", "end_date").ok_or_else(|| {
        SigtraderError::ConfigMissing {
            section: "backtest".into(),
            key: "end_date".into(),
        }
    })?;

    let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        SigtraderError::ConfigInvalid {
            section: "backtest".into(),
            key: "start_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;
    let end_date = NaiveDate::parse_from_str(&end_str, "%Y-%m-%d").map_err(|_| {
        SigtraderError::ConfigInvalid {
            section: "backtest".into(),
            key: "end_date".into(),
            reason: "invalid date format (expected YYYY-MM-DD)".into(),
        }
    })?;

    Ok(BacktestConfig {
        start_date,
        end_date,
        initial_capital: adapter.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL),
    })
}

pub fn build_strategy_params(adapter: &dyn ConfigPort) -> StrategyParams {
    let defaults = StrategyParams::default();
    let mult = adapter.get_double(
        "strategy",
        "bollinger_mult",
        defaults.bollinger_num_std_x100 as f64 / 100.0,
    );

    StrategyParams {
        macd_fast: adapter.get_int("strategy", "macd_fast", defaults.macd_fast as i64) as usize,
        macd_slow: adapter.get_int("strategy", "macd_slow", defaults.macd_slow as i64) as usize,
        macd_signal: adapter.get_int("strategy", "macd_signal", defaults.macd_signal as i64)
            as usize,
        rsi_period: adapter.get_int("strategy", "rsi_period", defaults.rsi_period as i64) as usize,
        thresholds: SignalThresholds {
            oversold: adapter.get_double("strategy", "rsi_oversold", defaults.thresholds.oversold),
            overbought: adapter.get_double(
                "strategy",
                "rsi_overbought",
                defaults.thresholds.overbought,
            ),
        },
        bollinger_period: adapter.get_int(
            "strategy",
            "bollinger_period",
            defaults.bollinger_period as i64,
        ) as usize,
        bollinger_num_std_x100: (mult * 100.0).round() as u32,
    }
}

pub fn resolve_symbols(symbol_override: Option<&str>, config: &dyn ConfigPort) -> Vec<String> {
    if let Some(s) = symbol_override {
        return vec![s.to_uppercase()];
    }

    if let Some(symbols_str) = config.get_string("backtest", "symbols") {
        return symbols_str
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(symbol) = config.get_string("backtest", "symbol") {
        let symbol = symbol.trim().to_uppercase();
        if !symbol.is_empty() {
            return vec![symbol];
        }
    }

    vec![]
}

pub fn data_dir(config: &dyn ConfigPort) -> Result<PathBuf, SigtraderError> {
    config
        .get_string("data", "dir")
        .map(PathBuf::from)
        .ok_or_else(|| SigtraderError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })
}

/// Fetch, compute signals, simulate, and report for each symbol.
///
/// Symbols whose quote file fails to load are skipped with a warning; the
/// call fails only when no symbol could be processed.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    params: &StrategyParams,
    bt_config: &BacktestConfig,
    symbols: &[String],
    output_dir: &Path,
) -> Result<(), SigtraderError> {
    let mut processed = 0usize;

    for symbol in symbols {
        let bars =
            match data_port.fetch_ohlcv(symbol, bt_config.start_date, bt_config.end_date) {
                Ok(bars) if !bars.is_empty() => bars,
                Ok(_) => {
                    eprintln!("warning: skipping {} (no bars in range)", symbol);
                    continue;
                }
                Err(e) => {
                    eprintln!("warning: skipping {} ({})", symbol, e);
                    continue;
                }
            };
        validate_series(&bars)?;

        let macd = calculate_macd(&bars, params.macd_fast, params.macd_slow, params.macd_signal)?;
        let rsi = calculate_rsi(&bars, params.rsi_period)?;
        let signals = generate_signals(&macd, &rsi, &params.thresholds)?;

        let counts = signal_counts(&signals);
        eprintln!(
            "{}: {} bars, {} buy / {} sell / {} hold signals",
            symbol,
            bars.len(),
            counts.buys,
            counts.sells,
            counts.holds,
        );

        let result = run_backtest(&bars, &signals, bt_config)?;
        let metrics = Metrics::compute(&result);

        eprintln!("  Initial capital: ${:.2}", result.initial_capital);
        eprintln!("  Final capital:   ${:.2}", result.final_capital);
        eprintln!("  Total return:    {:.2}%", metrics.total_return * 100.0);
        eprintln!(
            "  Trades:          {} ({} round trips, {:.1}% win rate)",
            result.trades.len(),
            metrics.round_trips,
            metrics.win_rate * 100.0,
        );

        let report_path = output_dir.join(format!("{}_report.txt", symbol));
        report_port.write(symbol, &result, &metrics, &report_path)?;
        eprintln!("  Report written to {}", report_path.display());

        processed += 1;
    }

    if processed == 0 {
        return Err(SigtraderError::NoData {
            symbol: symbols.join(", "),
        });
    }
    Ok(())
}

/// Compute all indicators for each symbol and write a merged CSV table.
pub fn run_indicator_export(
    data_port: &dyn DataPort,
    params: &StrategyParams,
    bt_config: &BacktestConfig,
    symbols: &[String],
    output_dir: &Path,
) -> Result<(), SigtraderError> {
    let mut processed = 0usize;

    for symbol in symbols {
        let bars =
            match data_port.fetch_ohlcv(symbol, bt_config.start_date, bt_config.end_date) {
                Ok(bars) if !bars.is_empty() => bars,
                Ok(_) => {
                    eprintln!("warning: skipping {} (no bars in range)", symbol);
                    continue;
                }
                Err(e) => {
                    eprintln!("warning: skipping {} ({})", symbol, e);
                    continue;
                }
            };
        validate_series(&bars)?;

        let macd = calculate_macd(&bars, params.macd_fast, params.macd_slow, params.macd_signal)?;
        let rsi = calculate_rsi(&bars, params.rsi_period)?;
        let bollinger =
            calculate_bollinger(&bars, params.bollinger_period, params.bollinger_num_std_x100)?;

        let output_path = output_dir.join(format!("{}_indicators.csv", symbol));
        write_indicator_table(&output_path, &bars, &macd, &rsi, &bollinger)?;
        eprintln!(
            "{}: indicator table written to {}",
            symbol,
            output_path.display()
        );
        processed += 1;
    }

    if processed == 0 {
        return Err(SigtraderError::NoData {
            symbol: symbols.join(", "),
        });
    }
    Ok(())
}

fn write_indicator_table(
    path: &Path,
    bars: &[crate::domain::ohlcv::OhlcvBar],
    macd: &crate::domain::indicator::IndicatorSeries,
    rsi: &crate::domain::indicator::IndicatorSeries,
    bollinger: &crate::domain::indicator::IndicatorSeries,
) -> Result<(), SigtraderError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| SigtraderError::Data {
        reason: format!("failed to open {}: {}", path.display(), e),
    })?;

    wtr.write_record([
        "date",
        "close",
        "macd",
        "macd_signal",
        "macd_histogram",
        "rsi",
        "bb_upper",
        "bb_middle",
        "bb_lower",
    ])
    .map_err(|e| SigtraderError::Data {
        reason: format!("CSV write error: {}", e),
    })?;

    for (i, bar) in bars.iter().enumerate() {
        let (m_line, m_signal, m_hist) = match &macd.values[i] {
            p if p.valid => match p.value {
                IndicatorValue::Macd {
                    line,
                    signal,
                    histogram,
                } => (
                    format!("{:.6}", line),
                    format!("{:.6}", signal),
                    format!("{:.6}", histogram),
                ),
                _ => (String::new(), String::new(), String::new()),
            },
            _ => (String::new(), String::new(), String::new()),
        };
        let rsi_val = match &rsi.values[i] {
            p if p.valid => match p.value {
                IndicatorValue::Simple(v) => format!("{:.6}", v),
                _ => String::new(),
            },
            _ => String::new(),
        };
        let (bb_upper, bb_middle, bb_lower) = match &bollinger.values[i] {
            p if p.valid => match p.value {
                IndicatorValue::Bollinger {
                    upper,
                    middle,
                    lower,
                } => (
                    format!("{:.6}", upper),
                    format!("{:.6}", middle),
                    format!("{:.6}", lower),
                ),
                _ => (String::new(), String::new(), String::new()),
            },
            _ => (String::new(), String::new(), String::new()),
        };

        wtr.write_record([
            bar.date.to_string(),
            format!("{:.6}", bar.close),
            m_line,
            m_signal,
            m_hist,
            rsi_val,
            bb_upper,
            bb_middle,
            bb_lower,
        ])
        .map_err(|e| SigtraderError::Data {
            reason: format!("CSV write error: {}", e),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

fn run_backtest_cmd(
    config_path: &Path,
    symbol_override: Option<&str>,
    output_dir: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let params = build_strategy_params(&adapter);

    let symbols = resolve_symbols(symbol_override, &adapter);
    if symbols.is_empty() {
        eprintln!("error: no symbols configured");
        return ExitCode::from(2);
    }

    let dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(dir);
    let report_port = TextReportAdapter::new();
    let output_dir = output_dir.unwrap_or_else(|| Path::new("."));

    eprintln!(
        "Running backtest: {} symbols, {} to {}",
        symbols.len(),
        bt_config.start_date,
        bt_config.end_date,
    );

    match run_backtest_pipeline(
        &data_port,
        &report_port,
        &params,
        &bt_config,
        &symbols,
        output_dir,
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_indicators_cmd(
    config_path: &Path,
    symbol_override: Option<&str>,
    output_dir: Option<&Path>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let params = build_strategy_params(&adapter);

    let symbols = resolve_symbols(symbol_override, &adapter);
    if symbols.is_empty() {
        eprintln!("error: no symbols configured");
        return ExitCode::from(2);
    }

    let dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(dir);
    let output_dir = output_dir.unwrap_or_else(|| Path::new("."));

    match run_indicator_export(&data_port, &params, &bt_config, &symbols, output_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_list_symbols(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(dir);

    let symbols = match data_port.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No quote files found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let params = build_strategy_params(&adapter);
    eprintln!("\nStrategy parameters:");
    eprintln!(
        "  MACD({},{},{})",
        params.macd_fast, params.macd_slow, params.macd_signal
    );
    eprintln!(
        "  RSI({}) thresholds {}/{}",
        params.rsi_period, params.thresholds.oversold, params.thresholds.overbought
    );
    eprintln!(
        "  BOLLINGER({},{})",
        params.bollinger_period,
        params.bollinger_num_std_x100 as f64 / 100.0
    );

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_info(config_path: &Path, symbol_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let symbols = resolve_symbols(symbol_override, &adapter);
    if symbols.is_empty() {
        eprintln!("error: no symbols configured");
        return ExitCode::from(2);
    }

    let dir = match data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let data_port = CsvAdapter::new(dir);

    for symbol in &symbols {
        match data_port.get_data_range(symbol) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, min_date, max_date);
            }
            Ok(None) => {
                eprintln!("{}: no data found", symbol);
            }
            Err(e) => {
                eprintln!("error querying {}: {}", symbol, e);
            }
        }
    }
    ExitCode::SUCCESS
}
