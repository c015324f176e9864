//! Configuration validation.
//!
//! Validates all config fields before a backtest runs, so a bad value fails
//! fast instead of surfacing mid-pipeline.

use crate::domain::error::SigtraderError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

use crate::domain::backtest::DEFAULT_INITIAL_CAPITAL;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_data_dir(config)?;
    validate_initial_capital(config)?;
    validate_dates(config)?;
    validate_symbols(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_period(config, "macd_fast", 12)?;
    validate_period(config, "macd_slow", 26)?;
    validate_period(config, "macd_signal", 9)?;
    validate_period(config, "rsi_period", 14)?;
    validate_period(config, "bollinger_period", 20)?;
    validate_bollinger_mult(config)?;
    validate_rsi_thresholds(config)?;
    Ok(())
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    match config.get_string("data", "dir") {
        Some(dir) if !dir.trim().is_empty() => Ok(()),
        _ => Err(SigtraderError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        }),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if value <= 0.0 {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_capital".to_string(),
            reason: "initial_capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let start_str = config.get_string("backtest", "start_date");
    let end_str = config.get_string("backtest", "end_date");

    let start_date = parse_date(start_str.as_deref(), "start_date")?;
    let end_date = parse_date(end_str.as_deref(), "end_date")?;

    if start_date >= end_date {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(value: Option<&str>, key: &str) -> Result<NaiveDate, SigtraderError> {
    let value = value.ok_or_else(|| SigtraderError::ConfigMissing {
        section: "backtest".to_string(),
        key: key.to_string(),
    })?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| SigtraderError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
    })
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let has_symbols = config
        .get_string("backtest", "symbols")
        .map(|s| s.split(',').any(|p| !p.trim().is_empty()))
        .unwrap_or(false);
    let has_symbol = config
        .get_string("backtest", "symbol")
        .map(|s| !s.trim().is_empty())
        .unwrap_or(false);

    if has_symbols || has_symbol {
        Ok(())
    } else {
        Err(SigtraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbols".to_string(),
        })
    }
}

fn validate_period(config: &dyn ConfigPort, key: &str, default: i64) -> Result<(), SigtraderError> {
    let value = config.get_int("strategy", key, default);
    if value < 1 {
        return Err(SigtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: "period must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_bollinger_mult(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = config.get_double("strategy", "bollinger_mult", 2.0);
    if value < 0.0 {
        return Err(SigtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "bollinger_mult".to_string(),
            reason: "bollinger_mult must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_rsi_thresholds(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let oversold = config.get_double("strategy", "rsi_oversold", 30.0);
    let overbought = config.get_double("strategy", "rsi_overbought", 70.0);

    for (key, value) in [("rsi_oversold", oversold), ("rsi_overbought", overbought)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(SigtraderError::ConfigInvalid {
                section: "strategy".to_string(),
                key: key.to_string(),
                reason: "RSI thresholds must be within [0, 100]".to_string(),
            });
        }
    }

    if oversold >= overbought {
        return Err(SigtraderError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "rsi_oversold".to_string(),
            reason: "rsi_oversold must be below rsi_overbought".to_string(),
        });
    }
    Ok(())
}
