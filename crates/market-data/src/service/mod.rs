//! Data-fetch facade.
//!
//! [`MarketDataService`] composes the cache store, the request gate and a
//! provider: every read checks the cache first, and every miss becomes a
//! gated vendor call whose result is written back under a deterministic key.
//! Concurrent requests for the same logical resource collapse into one
//! vendor call via per-key in-flight locks.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::join_all;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::{CacheCategory, CacheStore};
use crate::errors::MarketDataError;
use crate::gate::{GateStatus, Priority, RequestGate};
use crate::models::{
    CompanyOverview, DailySeries, GlobalQuote, IncomeStatement, OutputSize, SymbolMatch,
};
use crate::provider::MarketDataProvider;

/// Facade over cache + gate + provider. Construct once and share.
pub struct MarketDataService {
    cache: Arc<CacheStore>,
    gate: Arc<RequestGate>,
    provider: Arc<dyn MarketDataProvider>,
    /// Per-key locks collapsing concurrent fetches of the same resource.
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

impl MarketDataService {
    pub fn new(
        cache: Arc<CacheStore>,
        gate: Arc<RequestGate>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self {
            cache,
            gate,
            provider,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Latest quote for a symbol. Cached for 60 seconds; fetched at the
    /// highest priority.
    pub async fn quote(&self, symbol: &str) -> Result<GlobalQuote, MarketDataError> {
        let symbol = normalize_symbol(symbol);
        let key = format!("quote_{}", symbol);
        let provider = Arc::clone(&self.provider);

        self.fetch_cached(&key, CacheCategory::Quote, Priority::High, move || {
            async move { provider.global_quote(&symbol).await }
        })
        .await
    }

    /// Quotes for a collection of symbols.
    ///
    /// Concurrent from the caller's perspective; the gate serializes the
    /// underlying vendor calls. A failing symbol is logged and omitted from
    /// the result, never failing the batch.
    pub async fn quotes(&self, symbols: &[String]) -> Vec<GlobalQuote> {
        let fetches = symbols.iter().map(|symbol| async move {
            match self.quote(symbol).await {
                Ok(quote) => Some(quote),
                Err(e) => {
                    warn!("batch quote for '{}' failed: {}", symbol, e);
                    None
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Daily price history. Cached for an hour.
    pub async fn daily_series(
        &self,
        symbol: &str,
        output_size: OutputSize,
    ) -> Result<DailySeries, MarketDataError> {
        let symbol = normalize_symbol(symbol);
        let key = format!("daily_{}_{}", symbol, output_size.as_param());
        let provider = Arc::clone(&self.provider);

        self.fetch_cached(&key, CacheCategory::DailyPrices, Priority::Normal, move || {
            async move { provider.daily_series(&symbol, output_size).await }
        })
        .await
    }

    /// Company fundamentals. Cached for 24 hours; lowest priority.
    pub async fn overview(&self, symbol: &str) -> Result<CompanyOverview, MarketDataError> {
        let symbol = normalize_symbol(symbol);
        let key = format!("overview_{}", symbol);
        let provider = Arc::clone(&self.provider);

        self.fetch_cached(&key, CacheCategory::Overview, Priority::Low, move || {
            async move { provider.company_overview(&symbol).await }
        })
        .await
    }

    /// Annual income statements. Cached for 24 hours; lowest priority.
    pub async fn income_statement(&self, symbol: &str) -> Result<IncomeStatement, MarketDataError> {
        let symbol = normalize_symbol(symbol);
        let key = format!("financials_{}", symbol);
        let provider = Arc::clone(&self.provider);

        self.fetch_cached(&key, CacheCategory::Financials, Priority::Low, move || {
            async move { provider.income_statement(&symbol).await }
        })
        .await
    }

    /// Symbol search. Results share the fundamentals expiry; lowest priority.
    pub async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
        let normalized = query.trim().to_lowercase();
        let key = format!("search_{}", normalized);
        let provider = Arc::clone(&self.provider);
        let query = query.trim().to_string();

        self.fetch_cached(&key, CacheCategory::Overview, Priority::Low, move || {
            async move { provider.search(&query).await }
        })
        .await
    }

    /// Drop every cached resource for a symbol, across both cache tiers.
    pub fn invalidate_symbol(&self, symbol: &str) {
        self.cache.invalidate_containing(&normalize_symbol(symbol));
    }

    /// Gate snapshot for the quota indicator.
    pub fn status(&self) -> GateStatus {
        self.gate.status()
    }

    /// Cache-then-gate fetch for one logical resource.
    async fn fetch_cached<T, F, Fut>(
        &self,
        key: &str,
        category: CacheCategory,
        priority: Priority,
        make_call: F,
    ) -> Result<T, MarketDataError>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, MarketDataError>> + Send + 'static,
    {
        if let Some(hit) = self.cache.get::<T>(key) {
            debug!("cache hit for '{}'", key);
            return Ok(hit);
        }

        let key_lock = self.in_flight_lock(key);
        let held = key_lock.lock().await;

        // A peer may have filled the cache while we waited on the lock
        if let Some(hit) = self.cache.get::<T>(key) {
            debug!("cache hit for '{}' after in-flight wait", key);
            return Ok(hit);
        }

        let result = match Arc::clone(&self.gate).run(priority, make_call).await {
            Ok(value) => {
                self.cache.set(key, &value, category);
                Ok(value)
            }
            Err(e) => Err(e),
        };

        drop(held);
        self.release_in_flight(key);
        result
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, Arc<tokio::sync::Mutex<()>>>> {
        self.in_flight.lock().unwrap_or_else(|poisoned| {
            warn!("in-flight map mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn in_flight_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        Arc::clone(
            self.lock_in_flight()
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(()))),
        )
    }

    fn release_in_flight(&self, key: &str) {
        self.lock_in_flight().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryKvStore;
    use crate::gate::GateConfig;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn quote_for(symbol: &str) -> GlobalQuote {
        GlobalQuote {
            symbol: symbol.to_string(),
            price: dec!(100.0),
            open: dec!(99.0),
            high: dec!(101.0),
            low: dec!(98.5),
            volume: dec!(1000000),
            latest_trading_day: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            previous_close: dec!(99.5),
            change: dec!(0.5),
            change_percent: dec!(0.5025),
        }
    }

    struct MockProvider {
        call_count: AtomicUsize,
        fail_symbol: Option<String>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                fail_symbol: None,
            }
        }

        fn failing_for(symbol: &str) -> Self {
            Self {
                call_count: AtomicUsize::new(0),
                fail_symbol: Some(symbol.to_string()),
            }
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockProvider {
        async fn global_quote(&self, symbol: &str) -> Result<GlobalQuote, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail_symbol.as_deref() == Some(symbol) {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
            }
            Ok(quote_for(symbol))
        }

        async fn daily_series(
            &self,
            symbol: &str,
            _output_size: OutputSize,
        ) -> Result<DailySeries, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(DailySeries {
                symbol: symbol.to_string(),
                bars: vec![],
            })
        }

        async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(CompanyOverview {
                symbol: symbol.to_string(),
                ..Default::default()
            })
        }

        async fn income_statement(&self, symbol: &str) -> Result<IncomeStatement, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(IncomeStatement {
                symbol: symbol.to_string(),
                annual_reports: vec![],
            })
        }

        async fn search(&self, _query: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    fn service_with(provider: Arc<MockProvider>) -> MarketDataService {
        let store = Arc::new(MemoryKvStore::new());
        let cache = Arc::new(CacheStore::new(store.clone()));
        let gate = RequestGate::new(GateConfig::default(), store);
        MarketDataService::new(cache, gate, provider)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_suppresses_second_vendor_call() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider.clone());

        let first = service.quote("aapl").await.unwrap();
        assert_eq!(first.symbol, "AAPL");
        assert_eq!(provider.calls(), 1);

        let second = service.quote("AAPL").await.unwrap();
        assert_eq!(second.symbol, "AAPL");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_symbols_are_normalized_into_one_cache_key() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider.clone());

        service.quote(" aapl ").await.unwrap();
        service.quote("AAPL").await.unwrap();
        service.quote("aApL").await.unwrap();

        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_collapse_into_one_call() {
        let provider = Arc::new(MockProvider::new());
        let service = Arc::new(service_with(provider.clone()));

        let a = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.quote("AAPL").await })
        };
        let b = {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.quote("AAPL").await })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_isolates_per_symbol_failures() {
        let provider = Arc::new(MockProvider::failing_for("BAD"));
        let service = service_with(provider.clone());

        let symbols = vec!["AAPL".to_string(), "BAD".to_string(), "MSFT".to_string()];
        let quotes = service.quotes(&symbols).await;

        let fetched: Vec<&str> = quotes.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(fetched, vec!["AAPL", "MSFT"]);
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_is_not_cached() {
        let provider = Arc::new(MockProvider::failing_for("BAD"));
        let service = service_with(provider.clone());

        assert!(service.quote("BAD").await.is_err());
        assert!(service.quote("BAD").await.is_err());
        // Each attempt reached the vendor: failures are never written back
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_symbol_forces_refetch() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider.clone());

        service.quote("AAPL").await.unwrap();
        service.overview("AAPL").await.unwrap();
        service.quote("MSFT").await.unwrap();
        assert_eq!(provider.calls(), 3);

        service.invalidate_symbol("aapl");

        service.quote("AAPL").await.unwrap();
        service.overview("AAPL").await.unwrap();
        service.quote("MSFT").await.unwrap();
        // Both AAPL resources were refetched, MSFT stayed cached
        assert_eq!(provider.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_resources_have_distinct_keys() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider.clone());

        service.daily_series("AAPL", OutputSize::Compact).await.unwrap();
        service.daily_series("AAPL", OutputSize::Full).await.unwrap();
        service.daily_series("AAPL", OutputSize::Compact).await.unwrap();

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reflects_admitted_calls() {
        let provider = Arc::new(MockProvider::new());
        let service = service_with(provider.clone());

        service.quote("AAPL").await.unwrap();
        let status = service.status();
        assert_eq!(status.recent_window_count, 1);
        assert_eq!(status.daily_remaining, GateConfig::default().daily_max - 1);
    }
}
