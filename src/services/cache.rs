use async_trait::async_trait;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use crate::models::{InventoryHint, PropertyCandidate};
use crate::services::inventory::{InventoryReader, StoreError};

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Multi-tier cache manager
///
/// L1 is an in-process moka cache, L2 is Redis shared across instances.
/// Without a Redis connection the manager runs L1-only.
pub struct CacheManager {
    redis: Option<Arc<tokio::sync::Mutex<ConnectionManager>>>,
    l1_cache: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a cache manager backed by Redis
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            redis: Some(Arc::new(tokio::sync::Mutex::new(redis))),
            l1_cache: Self::build_l1(l1_size, ttl_secs),
            ttl_secs,
        })
    }

    /// Create an in-process cache without an L2 tier
    pub fn in_memory(l1_size: u64, ttl_secs: u64) -> Self {
        Self {
            redis: None,
            l1_cache: Self::build_l1(l1_size, ttl_secs),
            ttl_secs,
        }
    }

    fn build_l1(l1_size: u64, ttl_secs: u64) -> moka::future::Cache<String, Vec<u8>> {
        moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build()
    }

    pub fn has_l2(&self) -> bool {
        self.redis.is_some()
    }

    /// Get a value from cache (L1 first, then L2)
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(bytes) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_slice(&bytes)?);
        }

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let value: Option<String> = redis::cmd("GET")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
            drop(conn);

            if let Some(json) = value {
                tracing::trace!("L2 cache hit: {}", key);

                let bytes = json.as_bytes().to_vec();
                self.l1_cache.insert(key.to_string(), bytes).await;

                return Ok(serde_json::from_str(&json)?);
            }
        }

        tracing::trace!("Cache miss: {}", key);
        Err(CacheError::CacheMiss(key.to_string()))
    }

    /// Set a value in every available tier
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        self.l1_cache
            .insert(key.to_string(), json.as_bytes().to_vec())
            .await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl_secs)
                .arg(json)
                .query_async(&mut *conn)
                .await?;
        }

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Delete a value from both cache tiers
    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate(key).await;

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let _: () = redis::cmd("DEL")
                .arg(key)
                .query_async(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Drop every cached inventory snapshot, e.g. after a bulk listing import
    pub async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        self.l1_cache.invalidate_all();

        if let Some(redis) = &self.redis {
            let mut conn = redis.lock().await;
            let keys: Vec<String> = redis::cmd("KEYS")
                .arg(pattern)
                .query_async(&mut *conn)
                .await?;

            if !keys.is_empty() {
                let _: () = redis::cmd("DEL")
                    .arg(keys)
                    .query_async(&mut *conn)
                    .await?;
            }
        }

        tracing::debug!("Invalidated cache pattern: {}", pattern);
        Ok(())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            l2_enabled: self.has_l2(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub l2_enabled: bool,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub const INVENTORY_PATTERN: &'static str = "inventory:*";

    /// Key of an inventory snapshot for a pre-filter hint
    pub fn inventory(hint: &InventoryHint) -> String {
        format!(
            "inventory:{}:{}:{}",
            hint.purpose.as_str(),
            hint.property_type.map(|t| t.as_str()).unwrap_or("any"),
            hint.area.as_deref().unwrap_or("").to_lowercase()
        )
    }
}

/// Inventory reader that serves repeated hints from the cache
///
/// Cache failures never fail a search; they fall through to the inner
/// reader with a warning.
pub struct CachedInventory<R> {
    inner: R,
    cache: Arc<CacheManager>,
}

impl<R> CachedInventory<R> {
    pub fn new(inner: R, cache: Arc<CacheManager>) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl<R> InventoryReader for CachedInventory<R>
where
    R: InventoryReader,
{
    async fn fetch_candidates(&self, hint: &InventoryHint) -> Result<Vec<PropertyCandidate>, StoreError> {
        let key = CacheKey::inventory(hint);

        match self.cache.get::<Vec<PropertyCandidate>>(&key).await {
            Ok(candidates) => return Ok(candidates),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Inventory cache read failed for {}: {}", key, e),
        }

        let candidates = self.inner.fetch_candidates(hint).await?;

        if let Err(e) = self.cache.set(&key, &candidates).await {
            tracing::warn!("Inventory cache write failed for {}: {}", key, e);
        }

        Ok(candidates)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.inner.health_check().await
    }
}
