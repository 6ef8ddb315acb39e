//! Database model for watchlist items.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use marketlens_core::errors::{DatabaseError, Error, Result};
use marketlens_core::watchlists::WatchlistItem;
use serde::{Deserialize, Serialize};

/// Database model for one watchlist row. Timestamps are stored as RFC3339
/// text.
#[derive(Queryable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::watchlist_items)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItemDB {
    pub id: String,
    pub symbol: String,
    pub added_at: String,
}

impl WatchlistItemDB {
    pub fn from_domain(item: &WatchlistItem) -> Self {
        Self {
            id: item.id.clone(),
            symbol: item.symbol.clone(),
            added_at: item.added_at.to_rfc3339(),
        }
    }

    pub fn into_domain(self) -> Result<WatchlistItem> {
        let added_at = DateTime::parse_from_rfc3339(&self.added_at)
            .map_err(|e| {
                Error::Database(DatabaseError::Internal(format!(
                    "invalid added_at timestamp: {e}"
                )))
            })?
            .with_timezone(&Utc);

        Ok(WatchlistItem {
            id: self.id,
            symbol: self.symbol,
            added_at,
        })
    }
}
