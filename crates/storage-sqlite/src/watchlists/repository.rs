use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use super::model::WatchlistItemDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::watchlist_items::dsl::*;
use marketlens_core::errors::Result;
use marketlens_core::watchlists::{WatchlistItem, WatchlistRepositoryTrait};

pub struct WatchlistRepository {
    pool: Arc<DbPool>,
}

impl WatchlistRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WatchlistRepositoryTrait for WatchlistRepository {
    fn load_items(&self) -> Result<Vec<WatchlistItem>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = watchlist_items
            .order(added_at.asc())
            .load::<WatchlistItemDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter().map(WatchlistItemDB::into_domain).collect()
    }

    async fn insert_item(&self, item: WatchlistItem) -> Result<WatchlistItem> {
        let mut conn = get_connection(&self.pool)?;
        diesel::insert_into(watchlist_items)
            .values(&WatchlistItemDB::from_domain(&item))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(item)
    }

    async fn delete_by_symbol(&self, symbol_value: String) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let deleted = diesel::delete(watchlist_items.filter(symbol.eq(symbol_value)))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(deleted)
    }
}
