//! Alpha Vantage market data provider implementation.
//!
//! One HTTP GET per operation against the query endpoint, with the
//! `function` parameter selecting the operation:
//! - `GLOBAL_QUOTE` for latest quotes
//! - `TIME_SERIES_DAILY` for daily history
//! - `OVERVIEW` for company fundamentals
//! - `INCOME_STATEMENT` for annual financials
//! - `SYMBOL_SEARCH` for ticker search
//!
//! The vendor reports some errors inside nominally successful responses:
//! HTTP 200 bodies carrying a top-level `"Error Message"`, `"Note"` or
//! `"Information"` key. Those are detected here and surfaced as typed
//! errors, never returned as data.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::MarketDataError;
use crate::models::{
    CompanyOverview, DailyBar, DailySeries, FinancialReport, GlobalQuote, IncomeStatement,
    OutputSize, SymbolMatch,
};
use crate::provider::MarketDataProvider;

const BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage HTTP client.
///
/// The free tier allows 5 calls per minute and 500 per day; pacing is the
/// request gate's job, not this client's.
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
}

// ============================================================================
// Response structures
// ============================================================================

/// Error signals the vendor embeds in 200-status bodies.
#[derive(Debug, Default, Deserialize)]
struct VendorNotices {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

impl VendorNotices {
    /// Fail on any embedded vendor error.
    ///
    /// A `Note` always means the minute budget is gone. `Information` is
    /// rate limiting when phrased as such, otherwise a vendor error
    /// surfaced verbatim.
    fn ensure_clean(&self) -> Result<(), MarketDataError> {
        if let Some(msg) = &self.error_message {
            if msg.contains("Invalid API call") || msg.contains("not found") {
                return Err(MarketDataError::SymbolNotFound(msg.clone()));
            }
            return Err(MarketDataError::ProviderError {
                message: msg.clone(),
            });
        }

        if let Some(msg) = &self.note {
            warn!("vendor note treated as rate limit: {}", msg);
            return Err(MarketDataError::RateLimited);
        }

        if let Some(msg) = &self.information {
            if msg.contains("rate limit")
                || msg.contains("API call frequency")
                || msg.contains("requests per day")
            {
                return Err(MarketDataError::RateLimited);
            }
            return Err(MarketDataError::ProviderError {
                message: msg.clone(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct GlobalQuoteResponse {
    /// Left as raw JSON: the vendor returns an empty object for unknown
    /// symbols, which must read as "not found" rather than a decode error.
    #[serde(rename = "Global Quote")]
    quote: Option<serde_json::Value>,
    #[serde(flatten)]
    notices: VendorNotices,
}

#[derive(Debug, Deserialize)]
struct RawGlobalQuote {
    #[serde(rename = "01. symbol")]
    symbol: String,
    #[serde(rename = "02. open")]
    open: String,
    #[serde(rename = "03. high")]
    high: String,
    #[serde(rename = "04. low")]
    low: String,
    #[serde(rename = "05. price")]
    price: String,
    #[serde(rename = "06. volume")]
    volume: String,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: String,
    #[serde(rename = "08. previous close")]
    previous_close: String,
    #[serde(rename = "09. change")]
    change: String,
    #[serde(rename = "10. change percent")]
    change_percent: String,
}

#[derive(Debug, Deserialize)]
struct TimeSeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, RawDailyBar>>,
    #[serde(flatten)]
    notices: VendorNotices,
}

#[derive(Debug, Deserialize)]
struct RawDailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// OVERVIEW response. Only the fields that map to [`CompanyOverview`]; the
/// API returns many more.
#[derive(Debug, Deserialize)]
struct CompanyOverviewResponse {
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Exchange")]
    exchange: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "MarketCapitalization")]
    market_capitalization: Option<String>,
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "TrailingPE")]
    trailing_pe: Option<String>,
    #[serde(rename = "DividendYield")]
    dividend_yield: Option<String>,
    #[serde(rename = "52WeekHigh")]
    week_52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    week_52_low: Option<String>,
    #[serde(flatten)]
    notices: VendorNotices,
}

impl CompanyOverviewResponse {
    /// Parse a string field as f64, scrubbing the vendor's "None", "-", "0"
    /// and empty-string placeholders.
    fn parse_f64(s: &Option<String>) -> Option<f64> {
        s.as_ref()
            .filter(|v| !v.is_empty() && *v != "None" && *v != "-" && *v != "0")
            .and_then(|v| v.parse::<f64>().ok())
    }

    fn into_overview(self) -> Option<CompanyOverview> {
        let symbol = self.symbol.clone()?;
        Some(CompanyOverview {
            symbol,
            name: self.name,
            description: self.description,
            exchange: self.exchange,
            sector: self.sector,
            industry: self.industry,
            country: self.country,
            market_cap: Self::parse_f64(&self.market_capitalization),
            pe_ratio: Self::parse_f64(&self.pe_ratio).or_else(|| Self::parse_f64(&self.trailing_pe)),
            dividend_yield: Self::parse_f64(&self.dividend_yield),
            week_52_high: Self::parse_f64(&self.week_52_high),
            week_52_low: Self::parse_f64(&self.week_52_low),
        })
    }
}

#[derive(Debug, Deserialize)]
struct IncomeStatementResponse {
    symbol: Option<String>,
    #[serde(rename = "annualReports", default)]
    annual_reports: Vec<RawAnnualReport>,
    #[serde(flatten)]
    notices: VendorNotices,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnnualReport {
    fiscal_date_ending: String,
    reported_currency: Option<String>,
    total_revenue: Option<String>,
    gross_profit: Option<String>,
    operating_income: Option<String>,
    net_income: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(rename = "bestMatches", default)]
    best_matches: Vec<RawSymbolMatch>,
    #[serde(flatten)]
    notices: VendorNotices,
}

#[derive(Debug, Deserialize)]
struct RawSymbolMatch {
    #[serde(rename = "1. symbol")]
    symbol: String,
    #[serde(rename = "2. name")]
    name: String,
    #[serde(rename = "3. type")]
    kind: String,
    #[serde(rename = "4. region")]
    region: String,
    #[serde(rename = "8. currency")]
    currency: Option<String>,
    #[serde(rename = "9. matchScore")]
    match_score: Option<String>,
}

// ============================================================================
// Parse helpers
// ============================================================================

fn required_decimal(field: &str, value: &str) -> Result<Decimal, MarketDataError> {
    Decimal::from_str(value.trim()).map_err(|_| MarketDataError::Parse {
        message: format!("invalid number in '{}': '{}'", field, value),
    })
}

fn required_date(field: &str, value: &str) -> Result<NaiveDate, MarketDataError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| MarketDataError::Parse {
        message: format!("invalid date in '{}': '{}'", field, value),
    })
}

/// Percentage field ("1.0670%") parsed to its numeric part.
fn percent_decimal(field: &str, value: &str) -> Result<Decimal, MarketDataError> {
    required_decimal(field, value.trim().trim_end_matches('%'))
}

/// Decimal field that the vendor may report as "None", "-" or empty.
fn optional_decimal(value: &Option<String>) -> Option<Decimal> {
    value
        .as_ref()
        .filter(|v| !v.is_empty() && *v != "None" && *v != "-")
        .and_then(|v| Decimal::from_str(v).ok())
}

fn decode<'a, T: Deserialize<'a>>(body: &'a str) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| MarketDataError::Parse {
        message: format!("unexpected response shape: {}", e),
    })
}

// ============================================================================
// AlphaVantageClient implementation
// ============================================================================

impl AlphaVantageClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
        }
    }

    /// Make a request against the query endpoint.
    async fn fetch(&self, params: &[(&str, &str)]) -> Result<String, MarketDataError> {
        let mut all_params: Vec<(&str, &str)> = params.to_vec();
        all_params.push(("apikey", &self.api_key));

        let url = reqwest::Url::parse_with_params(BASE_URL, &all_params).map_err(|e| {
            MarketDataError::ProviderError {
                message: format!("failed to build URL: {}", e),
            }
        })?;

        debug!("request: {}", url.as_str().replace(&self.api_key, "***"));

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout
            } else {
                MarketDataError::Network(e)
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited);
        }
        if !status.is_success() {
            return Err(MarketDataError::ProviderError {
                message: format!("HTTP {}", status),
            });
        }

        response.text().await.map_err(MarketDataError::Network)
    }

    fn parse_global_quote(symbol: &str, body: &str) -> Result<GlobalQuote, MarketDataError> {
        let response: GlobalQuoteResponse = decode(body)?;
        response.notices.ensure_clean()?;

        let raw = match response.quote {
            Some(value) if value.as_object().is_some_and(|o| !o.is_empty()) => {
                serde_json::from_value::<RawGlobalQuote>(value).map_err(|e| {
                    MarketDataError::Parse {
                        message: format!("unexpected quote shape: {}", e),
                    }
                })?
            }
            _ => {
                return Err(MarketDataError::SymbolNotFound(format!(
                    "no quote data for symbol: {}",
                    symbol
                )))
            }
        };

        Ok(GlobalQuote {
            symbol: raw.symbol,
            price: required_decimal("05. price", &raw.price)?,
            open: required_decimal("02. open", &raw.open)?,
            high: required_decimal("03. high", &raw.high)?,
            low: required_decimal("04. low", &raw.low)?,
            volume: required_decimal("06. volume", &raw.volume)?,
            latest_trading_day: required_date("07. latest trading day", &raw.latest_trading_day)?,
            previous_close: required_decimal("08. previous close", &raw.previous_close)?,
            change: required_decimal("09. change", &raw.change)?,
            change_percent: percent_decimal("10. change percent", &raw.change_percent)?,
        })
    }

    fn parse_daily_series(symbol: &str, body: &str) -> Result<DailySeries, MarketDataError> {
        let response: TimeSeriesResponse = decode(body)?;
        response.notices.ensure_clean()?;

        let time_series = response.time_series.ok_or_else(|| {
            MarketDataError::SymbolNotFound(format!("no daily data for symbol: {}", symbol))
        })?;

        // Malformed rows are skipped rather than failing the whole series
        let mut bars: Vec<DailyBar> = time_series
            .into_iter()
            .filter_map(|(date_str, raw)| {
                let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").ok()?;
                Some(DailyBar {
                    date,
                    open: Decimal::from_str(&raw.open).ok()?,
                    high: Decimal::from_str(&raw.high).ok()?,
                    low: Decimal::from_str(&raw.low).ok()?,
                    close: Decimal::from_str(&raw.close).ok()?,
                    volume: Decimal::from_str(&raw.volume).ok()?,
                })
            })
            .collect();

        bars.sort_by_key(|bar| bar.date);

        debug!("parsed {} daily bars for {}", bars.len(), symbol);

        Ok(DailySeries {
            symbol: symbol.to_string(),
            bars,
        })
    }

    fn parse_company_overview(symbol: &str, body: &str) -> Result<CompanyOverview, MarketDataError> {
        let response: CompanyOverviewResponse = decode(body)?;
        response.notices.ensure_clean()?;

        response.into_overview().ok_or_else(|| {
            MarketDataError::SymbolNotFound(format!("no overview data for symbol: {}", symbol))
        })
    }

    fn parse_income_statement(symbol: &str, body: &str) -> Result<IncomeStatement, MarketDataError> {
        let response: IncomeStatementResponse = decode(body)?;
        response.notices.ensure_clean()?;

        if response.symbol.is_none() && response.annual_reports.is_empty() {
            return Err(MarketDataError::SymbolNotFound(format!(
                "no financial data for symbol: {}",
                symbol
            )));
        }

        let annual_reports = response
            .annual_reports
            .into_iter()
            .filter_map(|raw| {
                let fiscal_date_ending =
                    NaiveDate::parse_from_str(&raw.fiscal_date_ending, "%Y-%m-%d").ok()?;
                Some(FinancialReport {
                    fiscal_date_ending,
                    reported_currency: raw.reported_currency.unwrap_or_else(|| "USD".to_string()),
                    total_revenue: optional_decimal(&raw.total_revenue),
                    gross_profit: optional_decimal(&raw.gross_profit),
                    operating_income: optional_decimal(&raw.operating_income),
                    net_income: optional_decimal(&raw.net_income),
                })
            })
            .collect();

        Ok(IncomeStatement {
            symbol: response.symbol.unwrap_or_else(|| symbol.to_string()),
            annual_reports,
        })
    }

    fn parse_search(body: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
        let response: SearchResponse = decode(body)?;
        response.notices.ensure_clean()?;

        Ok(response
            .best_matches
            .into_iter()
            .map(|raw| SymbolMatch {
                symbol: raw.symbol,
                name: raw.name,
                kind: raw.kind,
                region: raw.region,
                currency: raw.currency,
                score: raw.match_score.and_then(|s| s.parse::<f64>().ok()),
            })
            .collect())
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageClient {
    async fn global_quote(&self, symbol: &str) -> Result<GlobalQuote, MarketDataError> {
        let params = [("function", "GLOBAL_QUOTE"), ("symbol", symbol)];
        let body = self.fetch(&params).await?;
        Self::parse_global_quote(symbol, &body)
    }

    async fn daily_series(
        &self,
        symbol: &str,
        output_size: OutputSize,
    ) -> Result<DailySeries, MarketDataError> {
        let params = [
            ("function", "TIME_SERIES_DAILY"),
            ("symbol", symbol),
            ("outputsize", output_size.as_param()),
        ];
        let body = self.fetch(&params).await?;
        Self::parse_daily_series(symbol, &body)
    }

    async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview, MarketDataError> {
        let params = [("function", "OVERVIEW"), ("symbol", symbol)];
        let body = self.fetch(&params).await?;
        Self::parse_company_overview(symbol, &body)
    }

    async fn income_statement(&self, symbol: &str) -> Result<IncomeStatement, MarketDataError> {
        let params = [("function", "INCOME_STATEMENT"), ("symbol", symbol)];
        let body = self.fetch(&params).await?;
        Self::parse_income_statement(symbol, &body)
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
        let params = [("function", "SYMBOL_SEARCH"), ("keywords", query)];
        let body = self.fetch(&params).await?;
        Self::parse_search(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const QUOTE_BODY: &str = r#"{
        "Global Quote": {
            "01. symbol": "AAPL",
            "02. open": "148.00",
            "03. high": "152.00",
            "04. low": "147.50",
            "05. price": "150.25",
            "06. volume": "58499129",
            "07. latest trading day": "2024-01-15",
            "08. previous close": "149.00",
            "09. change": "1.25",
            "10. change percent": "0.8389%"
        }
    }"#;

    #[test]
    fn test_parse_global_quote() {
        let quote = AlphaVantageClient::parse_global_quote("AAPL", QUOTE_BODY).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.price, dec!(150.25));
        assert_eq!(quote.volume, dec!(58499129));
        assert_eq!(quote.latest_trading_day.to_string(), "2024-01-15");
        assert_eq!(quote.change_percent, dec!(0.8389));
    }

    #[test]
    fn test_empty_global_quote_is_symbol_not_found() {
        let body = r#"{"Global Quote": {}}"#;
        let result = AlphaVantageClient::parse_global_quote("NOPE", body);
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(_))));
    }

    #[test]
    fn test_note_body_rejected_as_rate_limit() {
        // HTTP 200 with a Note is throttling, never valid data
        let body = r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#;
        let result = AlphaVantageClient::parse_global_quote("AAPL", body);
        assert!(matches!(result, Err(MarketDataError::RateLimited)));
    }

    #[test]
    fn test_information_rate_phrase_rejected_as_rate_limit() {
        let body = r#"{"Information": "We have detected your API key and our standard API rate limit is 25 requests per day."}"#;
        let result = AlphaVantageClient::parse_daily_series("AAPL", body);
        assert!(matches!(result, Err(MarketDataError::RateLimited)));
    }

    #[test]
    fn test_other_information_surfaced_verbatim() {
        let body = r#"{"Information": "This endpoint requires a premium subscription."}"#;
        let result = AlphaVantageClient::parse_daily_series("AAPL", body);
        match result {
            Err(MarketDataError::ProviderError { message }) => {
                assert!(message.contains("premium"));
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[test]
    fn test_error_message_maps_to_symbol_not_found() {
        let body = r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#;
        let result = AlphaVantageClient::parse_global_quote("BAD", body);
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(_))));
    }

    #[test]
    fn test_parse_daily_series_sorted_ascending() {
        let body = r#"{
            "Time Series (Daily)": {
                "2024-01-16": {"1. open": "151.00", "2. high": "153.00", "3. low": "150.00", "4. close": "152.50", "5. volume": "40000000"},
                "2024-01-15": {"1. open": "148.00", "2. high": "152.00", "3. low": "147.50", "4. close": "150.25", "5. volume": "58499129"}
            }
        }"#;

        let series = AlphaVantageClient::parse_daily_series("AAPL", body).unwrap();
        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.bars.len(), 2);
        assert!(series.bars[0].date < series.bars[1].date);
        assert_eq!(series.latest().unwrap().close, dec!(152.50));
    }

    #[test]
    fn test_daily_series_skips_malformed_rows() {
        let body = r#"{
            "Time Series (Daily)": {
                "2024-01-15": {"1. open": "148.00", "2. high": "152.00", "3. low": "147.50", "4. close": "150.25", "5. volume": "58499129"},
                "2024-01-16": {"1. open": "oops", "2. high": "153.00", "3. low": "150.00", "4. close": "152.50", "5. volume": "40000000"}
            }
        }"#;

        let series = AlphaVantageClient::parse_daily_series("AAPL", body).unwrap();
        assert_eq!(series.bars.len(), 1);
    }

    #[test]
    fn test_missing_time_series_is_symbol_not_found() {
        let result = AlphaVantageClient::parse_daily_series("NOPE", "{}");
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(_))));
    }

    #[test]
    fn test_parse_company_overview() {
        let body = r#"{
            "Symbol": "IBM",
            "Name": "International Business Machines",
            "Description": "IBM provides integrated solutions.",
            "Exchange": "NYSE",
            "Sector": "TECHNOLOGY",
            "Industry": "COMPUTER & OFFICE EQUIPMENT",
            "Country": "USA",
            "MarketCapitalization": "191234567890",
            "PERatio": "22.5",
            "DividendYield": "0.0455",
            "52WeekHigh": "199.18",
            "52WeekLow": "128.06"
        }"#;

        let overview = AlphaVantageClient::parse_company_overview("IBM", body).unwrap();
        assert_eq!(overview.symbol, "IBM");
        assert_eq!(overview.sector.as_deref(), Some("TECHNOLOGY"));
        assert_eq!(overview.market_cap, Some(191234567890.0));
        assert_eq!(overview.pe_ratio, Some(22.5));
        assert_eq!(overview.week_52_low, Some(128.06));
    }

    #[test]
    fn test_overview_scrubs_placeholder_numbers() {
        let body = r#"{
            "Symbol": "TEST",
            "Name": "Test Corp",
            "PERatio": "None",
            "DividendYield": "0",
            "52WeekHigh": "-"
        }"#;

        let overview = AlphaVantageClient::parse_company_overview("TEST", body).unwrap();
        assert_eq!(overview.pe_ratio, None);
        assert_eq!(overview.dividend_yield, None);
        assert_eq!(overview.week_52_high, None);
    }

    #[test]
    fn test_overview_without_symbol_is_not_found() {
        let result = AlphaVantageClient::parse_company_overview("NOPE", "{}");
        assert!(matches!(result, Err(MarketDataError::SymbolNotFound(_))));
    }

    #[test]
    fn test_parse_income_statement() {
        let body = r#"{
            "symbol": "IBM",
            "annualReports": [
                {
                    "fiscalDateEnding": "2023-12-31",
                    "reportedCurrency": "USD",
                    "totalRevenue": "61860000000",
                    "grossProfit": "34300000000",
                    "operatingIncome": "None",
                    "netIncome": "7502000000"
                }
            ]
        }"#;

        let statement = AlphaVantageClient::parse_income_statement("IBM", body).unwrap();
        assert_eq!(statement.symbol, "IBM");
        assert_eq!(statement.annual_reports.len(), 1);

        let report = &statement.annual_reports[0];
        assert_eq!(report.total_revenue, Some(dec!(61860000000)));
        assert_eq!(report.operating_income, None);
        assert_eq!(report.reported_currency, "USD");
    }

    #[test]
    fn test_parse_search() {
        let body = r#"{
            "bestMatches": [
                {
                    "1. symbol": "AAPL",
                    "2. name": "Apple Inc",
                    "3. type": "Equity",
                    "4. region": "United States",
                    "8. currency": "USD",
                    "9. matchScore": "1.0000"
                },
                {
                    "1. symbol": "AAPL34.SAO",
                    "2. name": "Apple Inc",
                    "3. type": "Equity",
                    "4. region": "Brazil/Sao Paolo",
                    "8. currency": "BRL",
                    "9. matchScore": "0.6154"
                }
            ]
        }"#;

        let matches = AlphaVantageClient::parse_search(body).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].symbol, "AAPL");
        assert_eq!(matches[0].score, Some(1.0));
        assert_eq!(matches[1].currency.as_deref(), Some("BRL"));
    }

    #[test]
    fn test_search_with_no_matches_is_empty() {
        let matches = AlphaVantageClient::parse_search(r#"{"bestMatches": []}"#).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_unparseable_body_is_parse_error() {
        let result = AlphaVantageClient::parse_global_quote("AAPL", "<html>nope</html>");
        assert!(matches!(result, Err(MarketDataError::Parse { .. })));
    }
}
