//! Read-through cache in front of the pollution fetcher.
//!
//! Entries are serialized [`PollutionReading`]s keyed by the raw `lat` and
//! `lon` query text concatenated, so `10.0`/`20.0` and `10.00`/`20.00` are
//! separate entries. Every entry carries its own expiry; a lookup past it is
//! a miss. Store failures never fail a request: they are logged and the
//! request falls through to a direct fetch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use tracing::{debug, warn};

use crate::error::SmogError;
use crate::types::{CoordinateQuery, PollutionReading};
use crate::upstream::AirQualityApi;

/// Key-value store with per-entry expiry.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SmogError>;

    async fn set_with_expiry(&self, key: &str, value: String, ttl: Duration) -> Result<(), SmogError>;
}

// ============================================================================
// Moka-backed store
// ============================================================================

#[derive(Debug, Clone)]
struct StoredValue {
    body: String,
    ttl: Duration,
}

/// Each entry lives for the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &StoredValue, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process store. Infallible; the `Result`s exist for the trait.
#[derive(Clone)]
pub struct MokaStore {
    cache: Cache<String, StoredValue>,
}

impl MokaStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl ReadingStore for MokaStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SmogError> {
        Ok(self.cache.get(key).await.map(|v| v.body))
    }

    async fn set_with_expiry(&self, key: &str, value: String, ttl: Duration) -> Result<(), SmogError> {
        self.cache
            .insert(key.to_string(), StoredValue { body: value, ttl })
            .await;
        Ok(())
    }
}

// ============================================================================
// Read-through wrapper
// ============================================================================

pub fn cache_key(raw_lat: &str, raw_lon: &str) -> String {
    format!("{raw_lat}{raw_lon}")
}

#[derive(Clone)]
pub struct PollutionCache {
    store: Arc<dyn ReadingStore>,
    ttl: Duration,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl PollutionCache {
    pub fn new(store: Arc<dyn ReadingStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Cached reading for `query`, fetching from `api` on a miss.
    ///
    /// Only successful readings are stored.
    pub async fn get_or_fetch(
        &self,
        api: &dyn AirQualityApi,
        query: &CoordinateQuery,
    ) -> Result<PollutionReading, SmogError> {
        let key = cache_key(&query.raw_lat, &query.raw_lon);

        match self.lookup(&key).await {
            Ok(Some(reading)) => {
                let hits = self.hits.fetch_add(1, Ordering::Relaxed) + 1;
                debug!("Cache hit for pollution {} (hits={}, misses={})", key, hits, self.misses());
                return Ok(reading);
            }
            Ok(None) => {}
            Err(e) => warn!("Pollution cache read failed for {}, fetching directly: {}", key, e),
        }

        let misses = self.misses.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Cache miss for pollution {} (hits={}, misses={})", key, self.hits(), misses);

        let reading = api.air_pollution(query.coordinates).await?;

        if let Err(e) = self.store(&key, &reading).await {
            warn!("Pollution cache write failed for {}: {}", key, e);
        }

        Ok(reading)
    }

    async fn lookup(&self, key: &str) -> Result<Option<PollutionReading>, SmogError> {
        match self.store.get(key).await? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    async fn store(&self, key: &str, reading: &PollutionReading) -> Result<(), SmogError> {
        let body = serde_json::to_string(reading)?;
        self.store.set_with_expiry(key, body, self.ttl).await
    }
}
