use common::models::WeatherSnapshot;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);
pub const DEFAULT_CAPACITY: usize = 10;

struct CacheEntry {
    data: WeatherSnapshot,
    fetched_at: Instant,
}

/// Bounded city -> snapshot store with lazy TTL validity.
///
/// Reads share the lock; inserts (including the eviction they may trigger)
/// take it exclusively, so no reader ever sees more than `capacity` entries.
pub struct WeatherCache {
    cache: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
}

/// Whether an entry fetched at `fetched_at` is still usable at `now`.
pub fn is_fresh(now: Instant, fetched_at: Instant, ttl: Duration) -> bool {
    now.saturating_duration_since(fetched_at) < ttl
}

impl WeatherCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        if capacity == 0 {
            warn!("Cache capacity of 0 requested, holding a single city instead");
        }
        let capacity = capacity.max(1);
        Self {
            cache: RwLock::new(HashMap::with_capacity(capacity)),
            ttl,
            capacity,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the cached snapshot for `city` if it is still fresh.
    pub async fn get(&self, city: &str) -> Option<WeatherSnapshot> {
        let cache = self.cache.read().await;
        if let Some(entry) = cache.get(city)
            && is_fresh(Instant::now(), entry.fetched_at, self.ttl)
        {
            return Some(entry.data.clone());
        }
        None
    }

    /// Stores `data` for `city`, evicting the oldest entry when the insert
    /// would grow the cache past capacity. Returns the evicted city, if any.
    pub async fn insert(&self, city: String, data: WeatherSnapshot) -> Option<String> {
        let mut cache = self.cache.write().await;

        let mut evicted = None;
        if cache.len() >= self.capacity && !cache.contains_key(&city) {
            let oldest = cache
                .iter()
                .min_by_key(|(_, entry)| entry.fetched_at)
                .map(|(key, _)| key.clone());

            if let Some(oldest) = oldest {
                cache.remove(&oldest);
                info!(city = %oldest, "The oldest cached city has been removed");
                evicted = Some(oldest);
            }
        }

        cache.insert(
            city,
            CacheEntry {
                data,
                fetched_at: Instant::now(),
            },
        );
        evicted
    }

    /// Snapshot of the cities currently held, fresh or not.
    pub async fn keys(&self) -> Vec<String> {
        self.cache.read().await.keys().cloned().collect()
    }

    pub async fn contains(&self, city: &str) -> bool {
        self.cache.read().await.contains_key(city)
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}
