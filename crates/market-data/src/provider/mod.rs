//! Market data provider abstraction and the Alpha Vantage implementation.

mod alpha_vantage;

pub use alpha_vantage::AlphaVantageClient;

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{
    CompanyOverview, DailySeries, GlobalQuote, IncomeStatement, OutputSize, SymbolMatch,
};

/// Trait for market data providers.
///
/// The fetch facade works against this trait; the production implementation
/// is [`AlphaVantageClient`]. Symbols are expected pre-normalized
/// (uppercased) by the caller.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Latest quote for a symbol.
    async fn global_quote(&self, symbol: &str) -> Result<GlobalQuote, MarketDataError>;

    /// Daily OHLCV history for a symbol, bars ascending by date.
    async fn daily_series(
        &self,
        symbol: &str,
        output_size: OutputSize,
    ) -> Result<DailySeries, MarketDataError>;

    /// Company fundamentals for a symbol.
    async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview, MarketDataError>;

    /// Annual income statements for a symbol.
    async fn income_statement(&self, symbol: &str) -> Result<IncomeStatement, MarketDataError>;

    /// Symbol search by ticker or name fragment.
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketDataError>;
}
