use chrono::{DateTime, Utc};
use nflverse_fetcher::DatasetId;
use polars::prelude::DataFrame;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Capacities of the two cache tiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub raw_capacity: usize,
    pub enriched_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            raw_capacity: 32,
            enriched_capacity: 16,
        }
    }
}

/// Key of a raw dataset fetch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawKey {
    pub dataset: DatasetId,
    pub years: Option<Vec<i32>>,
}

impl RawKey {
    /// Season-less datasets and empty year lists share the `None` key
    pub fn new(dataset: DatasetId, years: Option<&[i32]>) -> Self {
        let years = years
            .filter(|years| dataset.supports_years() && !years.is_empty())
            .map(<[i32]>::to_vec);
        Self { dataset, years }
    }
}

type Slot = Arc<OnceCell<Arc<DataFrame>>>;

#[derive(Debug)]
struct CachedSlot {
    slot: Slot,
    cached_at: DateTime<Utc>,
    last_used: u64,
}

/// One bounded LRU tier; each key owns a once-cell so concurrent misses
/// share a single computation
#[derive(Debug)]
struct Tier<K> {
    name: &'static str,
    capacity: usize,
    tick: u64,
    entries: HashMap<K, CachedSlot>,
}

impl<K: Eq + Hash + Clone + Debug> Tier<K> {
    fn new(name: &'static str, capacity: usize) -> Self {
        Self { name, capacity: capacity.max(1), tick: 0, entries: HashMap::new() }
    }

    fn slot(&mut self, key: &K) -> Slot {
        self.tick += 1;
        let tick = self.tick;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_used = tick;
            return entry.slot.clone();
        }

        if self.entries.len() >= self.capacity {
            self.evict_least_recent();
        }

        let slot = Slot::default();
        self.entries.insert(
            key.clone(),
            CachedSlot { slot: slot.clone(), cached_at: Utc::now(), last_used: tick },
        );
        slot
    }

    /// Loaded entries go first; in-flight loads only when nothing is loaded
    fn evict_least_recent(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (!entry.slot.initialized(), entry.last_used))
            .map(|(key, _)| key.clone());
        if let Some(key) = victim {
            if let Some(entry) = self.entries.remove(&key) {
                debug!("{} cache full, evicted {:?} (cached at {})", self.name, key, entry.cached_at);
            }
        }
    }

    /// Drop `key` if it still maps to `slot` and the load never completed
    fn forget_failed(&mut self, key: &K, slot: &Slot) {
        let failed = self
            .entries
            .get(key)
            .map_or(false, |entry| Arc::ptr_eq(&entry.slot, slot) && !entry.slot.initialized());
        if failed {
            self.entries.remove(key);
        }
    }

    fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    fn filled(&self) -> usize {
        self.entries.values().filter(|entry| entry.slot.initialized()).count()
    }
}

async fn get_or_load<K, F, Fut, E>(tier: &Mutex<Tier<K>>, key: K, load: F) -> Result<Arc<DataFrame>, E>
where
    K: Eq + Hash + Clone + Debug,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<DataFrame, E>>,
{
    let (name, slot) = {
        let mut tier = tier.lock();
        (tier.name, tier.slot(&key))
    };

    if let Some(frame) = slot.get() {
        debug!("{} cache hit for {:?}", name, key);
        return Ok(frame.clone());
    }

    debug!("{} cache miss for {:?}", name, key);
    match slot.get_or_try_init(|| async move { load().await.map(Arc::new) }).await {
        Ok(frame) => Ok(frame.clone()),
        Err(e) => {
            tier.lock().forget_failed(&key, &slot);
            Err(e)
        }
    }
}

/// Process-wide memo of raw datasets and enriched season frames
///
/// Each tier evicts its least recently used entry when full. A failed load
/// removes its key so the next request retries.
#[derive(Debug)]
pub struct StatsCache {
    raw: Mutex<Tier<RawKey>>,
    enriched: Mutex<Tier<i32>>,
}

impl StatsCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            raw: Mutex::new(Tier::new("raw", config.raw_capacity)),
            enriched: Mutex::new(Tier::new("enriched", config.enriched_capacity)),
        }
    }

    pub async fn raw_or_fetch<F, Fut, E>(&self, key: RawKey, fetch: F) -> Result<Arc<DataFrame>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<DataFrame, E>>,
    {
        get_or_load(&self.raw, key, fetch).await
    }

    pub async fn enriched_or_build<F, Fut, E>(&self, year: i32, build: F) -> Result<Arc<DataFrame>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<DataFrame, E>>,
    {
        get_or_load(&self.enriched, year, build).await
    }

    /// Drop every entry in both tiers
    pub fn clear(&self) {
        let mut raw = self.raw.lock();
        let mut enriched = self.enriched.lock();
        let removed_raw = raw.clear();
        let removed_enriched = enriched.clear();
        info!(
            "Cache cleared ({} raw, {} enriched entries removed)",
            removed_raw, removed_enriched
        );
    }

    pub fn stats(&self) -> CacheStats {
        let raw = self.raw.lock();
        let enriched = self.enriched.lock();
        CacheStats {
            raw_entries: raw.filled(),
            raw_capacity: raw.capacity,
            enriched_entries: enriched.filled(),
            enriched_capacity: enriched.capacity,
        }
    }
}

impl Default for StatsCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub raw_entries: usize,
    pub raw_capacity: usize,
    pub enriched_entries: usize,
    pub enriched_capacity: usize,
}
