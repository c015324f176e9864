//! OHLCV bar representation and series-shape validation.

use chrono::NaiveDate;

use crate::domain::error::SigtraderError;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Check that a loaded price series is strictly increasing by date with no
/// duplicate timestamps. The indicator engine relies on this ordering; the
/// reference implementation got it implicitly from its dataframe index, here
/// it is an explicit precondition.
pub fn validate_series(bars: &[OhlcvBar]) -> Result<(), SigtraderError> {
    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(SigtraderError::UnorderedSeries {
                detail: format!("{} followed by {}", pair[0].date, pair[1].date),
            });
        }
    }
    Ok(())
}
