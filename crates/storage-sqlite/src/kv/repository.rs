use std::sync::Arc;

use diesel::prelude::*;

use super::model::KvEntryDB;
use crate::db::DbPool;
use crate::schema::kv_entries::dsl::*;
use marketlens_market_data::{KvError, KvStore};

/// SQLite-backed [`KvStore`].
///
/// The cache store and the request gate treat this tier as best-effort, so
/// every failure is mapped to a [`KvError`] and handled (logged, degraded)
/// upstream.
pub struct SqliteKvStore {
    pool: Arc<DbPool>,
}

impl SqliteKvStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    fn connection(&self) -> Result<crate::db::DbConnection, KvError> {
        self.pool
            .get()
            .map_err(|e| KvError::Backend(e.to_string()))
    }
}

impl KvStore for SqliteKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.connection()?;
        kv_entries
            .filter(entry_key.eq(key))
            .select(entry_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(|e| KvError::Backend(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut conn = self.connection()?;
        diesel::replace_into(kv_entries)
            .values(&KvEntryDB {
                entry_key: key.to_string(),
                entry_value: value.to_string(),
            })
            .execute(&mut conn)
            .map_err(|e| KvError::Backend(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        let mut conn = self.connection()?;
        diesel::delete(kv_entries.filter(entry_key.eq(key)))
            .execute(&mut conn)
            .map_err(|e| KvError::Backend(e.to_string()))?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, KvError> {
        let mut conn = self.connection()?;
        kv_entries
            .select(entry_key)
            .load::<String>(&mut conn)
            .map_err(|e| KvError::Backend(e.to_string()))
    }

    fn clear(&self) -> Result<(), KvError> {
        let mut conn = self.connection()?;
        diesel::delete(kv_entries)
            .execute(&mut conn)
            .map_err(|e| KvError::Backend(e.to_string()))?;
        Ok(())
    }
}
