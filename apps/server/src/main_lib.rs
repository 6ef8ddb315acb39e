//! Application state wiring and tracing setup.

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use marketlens_ai::{CommentaryService, GeminiClient};
use marketlens_core::notes::{NoteService, NoteServiceTrait};
use marketlens_core::watchlists::{WatchlistService, WatchlistServiceTrait};
use marketlens_market_data::{
    AlphaVantageClient, CacheStore, GateConfig, KvStore, MarketDataService, RequestGate,
};
use marketlens_storage_sqlite::{
    create_pool, run_migrations, NoteRepository, SqliteKvStore, WatchlistRepository,
};

use crate::config::Config;

pub struct AppState {
    pub market_data: Arc<MarketDataService>,
    pub gate: Arc<RequestGate>,
    pub watchlist_service: Arc<dyn WatchlistServiceTrait>,
    pub note_service: Arc<dyn NoteServiceTrait>,
    /// Absent when no AI key is configured.
    pub commentary_service: Option<Arc<CommentaryService>>,
}

pub fn init_tracing() {
    let log_format = std::env::var("MLENS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let pool = create_pool(&config.db_path)?;
    run_migrations(&pool)?;
    tracing::info!("Database path in use: {}", config.db_path);

    // One shared durable backend serves both the cache tier and the
    // persisted daily counter.
    let kv: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new(pool.clone()));
    let cache = Arc::new(CacheStore::new(kv.clone()));
    let gate = RequestGate::new(GateConfig::default(), kv);

    let provider = Arc::new(AlphaVantageClient::new(
        config.alpha_vantage_key.clone().unwrap_or_default(),
    ));
    let market_data = Arc::new(MarketDataService::new(cache, gate.clone(), provider));

    let watchlist_repository = Arc::new(WatchlistRepository::new(pool.clone()));
    let watchlist_service: Arc<dyn WatchlistServiceTrait> =
        Arc::new(WatchlistService::new(watchlist_repository));

    let note_repository = Arc::new(NoteRepository::new(pool));
    let note_service: Arc<dyn NoteServiceTrait> = Arc::new(NoteService::new(note_repository));

    let commentary_service = config
        .gemini_key
        .as_ref()
        .map(|key| Arc::new(CommentaryService::new(GeminiClient::new(key.clone()))));

    Ok(Arc::new(AppState {
        market_data,
        gate,
        watchlist_service,
        note_service,
        commentary_service,
    }))
}
