//! Domain error types.

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid period for {indicator}: must be at least 1")]
    InvalidPeriod { indicator: String },

    #[error("empty price series passed to {operation}")]
    EmptyInput { operation: String },

    #[error("price series dates not strictly increasing: {detail}")]
    UnorderedSeries { detail: String },

    #[error("misaligned series: {detail}")]
    Misaligned { detail: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::Data { .. } => 3,
            SigtraderError::InvalidPeriod { .. }
            | SigtraderError::EmptyInput { .. }
            | SigtraderError::UnorderedSeries { .. }
            | SigtraderError::Misaligned { .. } => 4,
            SigtraderError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
