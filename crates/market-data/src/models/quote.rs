use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest quote for a single symbol.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalQuote {
    /// Ticker symbol (e.g., "AAPL")
    pub symbol: String,

    /// Current/most recent price
    pub price: Decimal,

    /// Opening price of the latest session
    pub open: Decimal,

    /// Session high
    pub high: Decimal,

    /// Session low
    pub low: Decimal,

    /// Session volume
    pub volume: Decimal,

    /// Date of the latest trading session
    pub latest_trading_day: NaiveDate,

    /// Previous session's close
    pub previous_close: Decimal,

    /// Absolute change versus the previous close
    pub change: Decimal,

    /// Change as a percentage of the previous close (e.g., 1.067 for +1.067%)
    pub change_percent: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_serialization_uses_camel_case() {
        let quote = GlobalQuote {
            symbol: "AAPL".to_string(),
            price: dec!(150.25),
            open: dec!(148.00),
            high: dec!(152.00),
            low: dec!(147.50),
            volume: dec!(1000000),
            latest_trading_day: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            previous_close: dec!(149.00),
            change: dec!(1.25),
            change_percent: dec!(0.8389),
        };

        let json = serde_json::to_string(&quote).unwrap();
        assert!(json.contains("latestTradingDay"));
        assert!(json.contains("previousClose"));
        assert!(json.contains("changePercent"));
    }

    #[test]
    fn test_quote_round_trips_through_json() {
        let quote = GlobalQuote {
            symbol: "MSFT".to_string(),
            price: dec!(420.10),
            open: dec!(418.00),
            high: dec!(421.00),
            low: dec!(417.20),
            volume: dec!(21500000),
            latest_trading_day: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            previous_close: dec!(419.00),
            change: dec!(1.10),
            change_percent: dec!(0.2625),
        };

        let json = serde_json::to_string(&quote).unwrap();
        let back: GlobalQuote = serde_json::from_str(&json).unwrap();
        assert_eq!(back.symbol, "MSFT");
        assert_eq!(back.price, dec!(420.10));
        assert_eq!(back.change_percent, dec!(0.2625));
    }
}
