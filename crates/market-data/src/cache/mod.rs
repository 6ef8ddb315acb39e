//! Two-tier TTL cache for vendor responses.
//!
//! The transient tier is an in-process map; the durable tier is any
//! [`KvStore`] backend. Expiry is evaluated lazily at read time - an expired
//! entry is purged from both tiers the moment a read touches it. The only
//! sweep is a best-effort pass over the durable tier when a durable write
//! fails, which reclaims entries whose lifetime has already passed.
//!
//! Durable-tier failures never reach callers: the cache degrades to
//! memory-only behavior and logs a warning.

mod kv;

pub use kv::{KvError, KvStore, MemoryKvStore};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Namespace prefix for durable cache keys, so the backend can be shared
/// with other persisted state.
const DURABLE_PREFIX: &str = "mlens_cache_";

/// Expiry class for cached vendor data.
///
/// Each category carries a fixed time-to-live; an entry's expiry is always
/// its creation time plus the category's duration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CacheCategory {
    /// Latest quotes: 60 seconds.
    Quote,
    /// Daily price history: 1 hour.
    DailyPrices,
    /// Company fundamentals: 24 hours.
    Overview,
    /// Financial statements: 24 hours.
    Financials,
}

impl CacheCategory {
    /// Fixed time-to-live for entries in this category.
    pub fn ttl(&self) -> Duration {
        match self {
            Self::Quote => Duration::seconds(60),
            Self::DailyPrices => Duration::seconds(3600),
            Self::Overview => Duration::seconds(86_400),
            Self::Financials => Duration::seconds(86_400),
        }
    }
}

/// A cached payload with its lifetime bounds.
///
/// This is also the durable representation: entries are stored as the JSON
/// serialization of this struct.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CachedEntry {
    data: serde_json::Value,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CachedEntry {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

fn durable_key(key: &str) -> String {
    format!("{DURABLE_PREFIX}{key}")
}

/// Two-tier cache: transient map in front of a durable [`KvStore`].
pub struct CacheStore {
    memory: Mutex<HashMap<String, CachedEntry>>,
    durable: Arc<dyn KvStore>,
}

impl CacheStore {
    pub fn new(durable: Arc<dyn KvStore>) -> Self {
        Self {
            memory: Mutex::new(HashMap::new()),
            durable,
        }
    }

    /// A cache backed by an in-memory "durable" tier. Nothing survives a
    /// restart; useful for tests and keyless setups.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKvStore::new()))
    }

    /// Lock the transient tier, recovering from poison if necessary.
    ///
    /// The worst case after recovery is a stale or missing cache entry,
    /// which the read path already tolerates.
    fn lock_memory(&self) -> MutexGuard<'_, HashMap<String, CachedEntry>> {
        self.memory.lock().unwrap_or_else(|poisoned| {
            warn!("cache memory tier mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Write `value` under `key` with the expiry of `category`.
    ///
    /// Both tiers are written. A durable-tier failure keeps the transient
    /// write and triggers a best-effort sweep of already-expired durable
    /// entries.
    pub fn set<T: Serialize>(&self, key: &str, value: &T, category: CacheCategory) {
        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(e) => {
                warn!("cache write for '{}' skipped, value not serializable: {}", key, e);
                return;
            }
        };

        let now = Utc::now();
        let entry = CachedEntry {
            data,
            created_at: now,
            expires_at: now + category.ttl(),
        };

        self.lock_memory().insert(key.to_string(), entry.clone());

        match serde_json::to_string(&entry) {
            Ok(raw) => {
                if let Err(e) = self.durable.set(&durable_key(key), &raw) {
                    warn!(
                        "durable cache write failed for '{}', keeping memory tier only: {}",
                        key, e
                    );
                    self.sweep_expired_durable();
                }
            }
            Err(e) => warn!("failed to encode cache entry '{}': {}", key, e),
        }
    }

    /// Read the value for `key`, consulting the transient tier first and
    /// falling back to the durable tier (re-populating the transient tier on
    /// a durable hit).
    ///
    /// Expiry is checked here, at read time: an expired entry is deleted
    /// from both tiers and the read misses.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let now = Utc::now();

        let transient = self.lock_memory().get(key).cloned();
        if let Some(entry) = transient {
            if entry.is_expired_at(now) {
                debug!("cache entry '{}' expired, purging", key);
                self.evict(key);
                return None;
            }
            return Self::decode(key, entry.data);
        }

        match self.durable.get(&durable_key(key)) {
            Ok(Some(raw)) => match serde_json::from_str::<CachedEntry>(&raw) {
                Ok(entry) => {
                    if entry.is_expired_at(now) {
                        debug!("durable cache entry '{}' expired, purging", key);
                        self.evict(key);
                        return None;
                    }
                    self.lock_memory().insert(key.to_string(), entry.clone());
                    Self::decode(key, entry.data)
                }
                Err(e) => {
                    warn!("corrupt durable cache entry '{}', discarding: {}", key, e);
                    if let Err(e) = self.durable.remove(&durable_key(key)) {
                        warn!("failed to discard corrupt entry '{}': {}", key, e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("durable cache read failed for '{}': {}", key, e);
                None
            }
        }
    }

    /// Delete `key` from both tiers unconditionally.
    pub fn invalidate(&self, key: &str) {
        self.evict(key);
    }

    /// Delete every entry whose key contains `fragment`, across both tiers.
    ///
    /// Callers pass a normalized (uppercased) symbol so all of a symbol's
    /// resources go together.
    pub fn invalidate_containing(&self, fragment: &str) {
        self.lock_memory().retain(|key, _| !key.contains(fragment));

        match self.durable.keys() {
            Ok(keys) => {
                for full_key in keys {
                    let Some(key) = full_key.strip_prefix(DURABLE_PREFIX) else {
                        continue;
                    };
                    if key.contains(fragment) {
                        if let Err(e) = self.durable.remove(&full_key) {
                            warn!("failed to invalidate durable entry '{}': {}", key, e);
                        }
                    }
                }
            }
            Err(e) => warn!("durable invalidation scan failed: {}", e),
        }
    }

    /// Empty both tiers.
    ///
    /// Only keys in the cache namespace are touched on the durable side; the
    /// backend may be shared with other persisted state.
    pub fn clear(&self) {
        self.lock_memory().clear();

        match self.durable.keys() {
            Ok(keys) => {
                for full_key in keys {
                    if full_key.starts_with(DURABLE_PREFIX) {
                        if let Err(e) = self.durable.remove(&full_key) {
                            warn!("failed to clear durable entry '{}': {}", full_key, e);
                        }
                    }
                }
            }
            Err(e) => warn!("durable clear scan failed: {}", e),
        }
    }

    fn evict(&self, key: &str) {
        self.lock_memory().remove(key);
        if let Err(e) = self.durable.remove(&durable_key(key)) {
            warn!("failed to evict durable entry '{}': {}", key, e);
        }
    }

    fn decode<T: DeserializeOwned>(key: &str, data: serde_json::Value) -> Option<T> {
        match serde_json::from_value(data) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    "cached payload for '{}' does not match the requested type: {}",
                    key, e
                );
                None
            }
        }
    }

    /// Best-effort reclamation of durable entries whose lifetime has passed.
    /// Unreadable entries are reclaimed as well. Backend errors are ignored;
    /// this runs when the backend is already struggling.
    fn sweep_expired_durable(&self) {
        let Ok(keys) = self.durable.keys() else {
            return;
        };

        let now = Utc::now();
        let mut swept = 0usize;
        for full_key in keys {
            if !full_key.starts_with(DURABLE_PREFIX) {
                continue;
            }
            let drop_it = match self.durable.get(&full_key) {
                Ok(Some(raw)) => match serde_json::from_str::<CachedEntry>(&raw) {
                    Ok(entry) => entry.is_expired_at(now),
                    Err(_) => true,
                },
                Ok(None) => false,
                Err(_) => false,
            };
            if drop_it && self.durable.remove(&full_key).is_ok() {
                swept += 1;
            }
        }

        if swept > 0 {
            debug!("swept {} expired durable cache entries", swept);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend that accepts reads but refuses writes, for degraded-mode tests.
    struct ReadOnlyKvStore {
        inner: MemoryKvStore,
    }

    impl KvStore for ReadOnlyKvStore {
        fn get(&self, key: &str) -> Result<Option<String>, KvError> {
            self.inner.get(key)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), KvError> {
            Err(KvError::Backend("capacity exceeded".to_string()))
        }
        fn remove(&self, key: &str) -> Result<(), KvError> {
            self.inner.remove(key)
        }
        fn keys(&self) -> Result<Vec<String>, KvError> {
            self.inner.keys()
        }
        fn clear(&self) -> Result<(), KvError> {
            self.inner.clear()
        }
    }

    /// Rewind an entry's lifetime in both tiers, simulating elapsed time.
    fn backdate(cache: &CacheStore, key: &str, seconds: i64) {
        let shift = Duration::seconds(seconds);
        let mut moved = None;
        {
            let mut memory = cache.lock_memory();
            if let Some(entry) = memory.get_mut(key) {
                entry.created_at -= shift;
                entry.expires_at -= shift;
                moved = Some(entry.clone());
            }
        }
        if let Some(entry) = moved {
            let raw = serde_json::to_string(&entry).unwrap();
            cache.durable.set(&durable_key(key), &raw).unwrap();
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        price: i64,
    }

    #[test]
    fn test_get_returns_most_recent_set() {
        let cache = CacheStore::in_memory();
        cache.set("quote_AAPL", &Payload { price: 150 }, CacheCategory::Quote);
        cache.set("quote_AAPL", &Payload { price: 151 }, CacheCategory::Quote);

        let hit: Payload = cache.get("quote_AAPL").unwrap();
        assert_eq!(hit.price, 151);
    }

    #[test]
    fn test_expiry_is_created_at_plus_category_ttl() {
        let cache = CacheStore::in_memory();
        cache.set("quote_AAPL", &Payload { price: 1 }, CacheCategory::Quote);
        cache.set("daily_AAPL_compact", &Payload { price: 1 }, CacheCategory::DailyPrices);
        cache.set("overview_AAPL", &Payload { price: 1 }, CacheCategory::Overview);
        cache.set("financials_AAPL", &Payload { price: 1 }, CacheCategory::Financials);

        let memory = cache.lock_memory();
        for (key, ttl) in [
            ("quote_AAPL", 60),
            ("daily_AAPL_compact", 3600),
            ("overview_AAPL", 86_400),
            ("financials_AAPL", 86_400),
        ] {
            let entry = memory.get(key).unwrap();
            assert_eq!(
                entry.expires_at - entry.created_at,
                Duration::seconds(ttl),
                "wrong ttl for {key}"
            );
        }
    }

    #[test]
    fn test_quote_fresh_at_30s_gone_at_61s() {
        let cache = CacheStore::in_memory();
        cache.set("quote_AAPL", &Payload { price: 150 }, CacheCategory::Quote);

        backdate(&cache, "quote_AAPL", 30);
        let hit: Option<Payload> = cache.get("quote_AAPL");
        assert_eq!(hit, Some(Payload { price: 150 }));

        backdate(&cache, "quote_AAPL", 31);
        let miss: Option<Payload> = cache.get("quote_AAPL");
        assert!(miss.is_none());
    }

    #[test]
    fn test_expired_entry_is_purged_from_both_tiers() {
        let cache = CacheStore::in_memory();
        cache.set("quote_AAPL", &Payload { price: 150 }, CacheCategory::Quote);
        backdate(&cache, "quote_AAPL", 61);

        let miss: Option<Payload> = cache.get("quote_AAPL");
        assert!(miss.is_none());

        assert!(cache.lock_memory().get("quote_AAPL").is_none());
        assert!(cache
            .durable
            .get(&durable_key("quote_AAPL"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_durable_hit_repopulates_memory_tier() {
        let backend = Arc::new(MemoryKvStore::new());
        let first = CacheStore::new(backend.clone());
        first.set("overview_AAPL", &Payload { price: 7 }, CacheCategory::Overview);

        // Fresh store over the same backend, as after a restart
        let second = CacheStore::new(backend);
        assert!(second.lock_memory().is_empty());

        let hit: Payload = second.get("overview_AAPL").unwrap();
        assert_eq!(hit.price, 7);
        assert!(second.lock_memory().contains_key("overview_AAPL"));
    }

    #[test]
    fn test_invalidate_containing_leaves_other_symbols() {
        let cache = CacheStore::in_memory();
        cache.set("quote_AAPL", &Payload { price: 1 }, CacheCategory::Quote);
        cache.set("overview_AAPL", &Payload { price: 2 }, CacheCategory::Overview);
        cache.set("quote_MSFT", &Payload { price: 3 }, CacheCategory::Quote);

        cache.invalidate_containing("AAPL");

        let a: Option<Payload> = cache.get("quote_AAPL");
        let b: Option<Payload> = cache.get("overview_AAPL");
        let c: Option<Payload> = cache.get("quote_MSFT");
        assert!(a.is_none());
        assert!(b.is_none());
        assert_eq!(c, Some(Payload { price: 3 }));
    }

    #[test]
    fn test_clear_empties_both_tiers() {
        let cache = CacheStore::in_memory();
        cache.set("quote_AAPL", &Payload { price: 1 }, CacheCategory::Quote);
        cache.set("quote_MSFT", &Payload { price: 2 }, CacheCategory::Quote);

        cache.clear();

        assert!(cache.lock_memory().is_empty());
        assert!(cache.durable.keys().unwrap().is_empty());
        let miss: Option<Payload> = cache.get("quote_AAPL");
        assert!(miss.is_none());
    }

    #[test]
    fn test_failed_durable_write_degrades_to_memory_only() {
        let cache = CacheStore::new(Arc::new(ReadOnlyKvStore {
            inner: MemoryKvStore::new(),
        }));

        cache.set("quote_AAPL", &Payload { price: 150 }, CacheCategory::Quote);

        // Caller still sees the value through the memory tier
        let hit: Payload = cache.get("quote_AAPL").unwrap();
        assert_eq!(hit.price, 150);
    }

    #[test]
    fn test_failed_durable_write_sweeps_expired_entries() {
        let inner = MemoryKvStore::new();
        let stale = CachedEntry {
            data: serde_json::json!({"price": 1}),
            created_at: Utc::now() - Duration::seconds(7200),
            expires_at: Utc::now() - Duration::seconds(3600),
        };
        inner
            .set(
                &durable_key("quote_OLD"),
                &serde_json::to_string(&stale).unwrap(),
            )
            .unwrap();

        let cache = CacheStore::new(Arc::new(ReadOnlyKvStore { inner }));
        cache.set("quote_NEW", &Payload { price: 2 }, CacheCategory::Quote);

        // The failed write triggered the sweep, which removed the stale entry
        assert!(cache.durable.get(&durable_key("quote_OLD")).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_durable_entry_reads_as_miss_and_is_discarded() {
        let backend = Arc::new(MemoryKvStore::new());
        backend
            .set(&durable_key("quote_AAPL"), "not valid json")
            .unwrap();

        let cache = CacheStore::new(backend.clone());
        let miss: Option<Payload> = cache.get("quote_AAPL");
        assert!(miss.is_none());
        assert!(backend.get(&durable_key("quote_AAPL")).unwrap().is_none());
    }
}
