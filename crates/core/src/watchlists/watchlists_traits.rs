use crate::errors::Result;
use crate::watchlists::watchlists_model::{NewWatchlistItem, WatchlistItem};
use async_trait::async_trait;

/// Trait for watchlist repository operations
#[async_trait]
pub trait WatchlistRepositoryTrait: Send + Sync {
    fn load_items(&self) -> Result<Vec<WatchlistItem>>;
    async fn insert_item(&self, item: WatchlistItem) -> Result<WatchlistItem>;
    async fn delete_by_symbol(&self, symbol: String) -> Result<usize>;
}

/// Trait for watchlist service operations
#[async_trait]
pub trait WatchlistServiceTrait: Send + Sync {
    fn get_watchlist(&self) -> Result<Vec<WatchlistItem>>;
    async fn add_symbol(&self, new_item: NewWatchlistItem) -> Result<WatchlistItem>;
    async fn remove_symbol(&self, symbol: String) -> Result<usize>;
}
