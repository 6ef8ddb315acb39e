use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use uuid::Uuid;

use crate::errors::{Result, ValidationError};
use crate::watchlists::watchlists_model::{NewWatchlistItem, WatchlistItem};
use crate::watchlists::watchlists_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};

/// Service for managing the watchlist.
///
/// Symbols are normalized to uppercase so "aapl" and "AAPL" are the same
/// entry; duplicates are rejected.
pub struct WatchlistService {
    repository: Arc<dyn WatchlistRepositoryTrait>,
}

impl WatchlistService {
    pub fn new(repository: Arc<dyn WatchlistRepositoryTrait>) -> Self {
        Self { repository }
    }
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

#[async_trait]
impl WatchlistServiceTrait for WatchlistService {
    fn get_watchlist(&self) -> Result<Vec<WatchlistItem>> {
        self.repository.load_items()
    }

    async fn add_symbol(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem> {
        let symbol = normalize_symbol(&new_item.symbol);
        if symbol.is_empty() {
            return Err(ValidationError::InvalidInput("symbol must not be empty".to_string()).into());
        }

        let existing = self.repository.load_items()?;
        if existing.iter().any(|item| item.symbol == symbol) {
            return Err(ValidationError::AlreadyExists(symbol).into());
        }

        let item = WatchlistItem {
            id: Uuid::new_v4().to_string(),
            symbol: symbol.clone(),
            added_at: Utc::now(),
        };

        debug!("adding '{}' to watchlist", symbol);
        self.repository.insert_item(item).await
    }

    async fn remove_symbol(&self, symbol: String) -> Result<usize> {
        let symbol = normalize_symbol(&symbol);
        self.repository.delete_by_symbol(symbol).await
    }
}
