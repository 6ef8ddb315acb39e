use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How much history to request from the vendor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputSize {
    /// The latest ~100 data points.
    Compact,
    /// The full available history.
    Full,
}

impl OutputSize {
    /// Value for the vendor's `outputsize` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

/// One daily OHLCV bar.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Daily price history for one symbol, bars sorted by date ascending.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySeries {
    pub symbol: String,
    pub bars: Vec<DailyBar>,
}

impl DailySeries {
    /// The most recent bar, if any.
    pub fn latest(&self) -> Option<&DailyBar> {
        self.bars.last()
    }
}
