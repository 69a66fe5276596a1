mod noop_store;
mod redis_store;

use std::future::Future;
use std::time::Duration;

use anyhow::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use noop_store::NoopCacheStore;
use redis_store::RedisCacheStore;

/// Guild configuration rarely changes; keep it briefly.
pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(300);
/// Tag, meme and filter-word name lists are read on every autocomplete keystroke.
pub const LIST_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
enum CacheBackend {
    Disabled(NoopCacheStore),
    Redis(RedisCacheStore),
    #[cfg(test)]
    Memory(memory_store::MemoryCacheStore),
}

/// Read-through JSON cache in front of the config store.
#[derive(Clone, Debug)]
pub struct CacheService {
    key_prefix: String,
    backend: CacheBackend,
}

impl CacheService {
    pub fn disabled(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Disabled(NoopCacheStore),
        }
    }

    pub fn redis(redis_url: &str, prefix: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Redis(RedisCacheStore::from_url(redis_url)?),
        })
    }

    #[cfg(test)]
    fn memory(prefix: impl Into<String>) -> Self {
        Self {
            key_prefix: prefix.into(),
            backend: CacheBackend::Memory(memory_store::MemoryCacheStore::default()),
        }
    }

    pub fn is_redis_enabled(&self) -> bool {
        matches!(self.backend, CacheBackend::Redis(_))
    }

    pub fn key(&self, suffix: impl AsRef<str>) -> String {
        format!("{}:{}", self.key_prefix, suffix.as_ref())
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(store) => store.ping().await,
            CacheBackend::Redis(store) => store.ping().await,
            #[cfg(test)]
            CacheBackend::Memory(_) => Ok(()),
        }
    }

    pub async fn get_json<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let value = match &self.backend {
            CacheBackend::Disabled(store) => store.get(key).await,
            CacheBackend::Redis(store) => store.get(key).await,
            #[cfg(test)]
            CacheBackend::Memory(store) => store.get(key).await,
        }?;

        value
            .map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .with_context(|| format!("failed to deserialize cache value for `{key}`"))
    }

    pub async fn set_json<T>(&self, key: &str, value: &T, ttl: Duration) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        let ttl_seconds = ttl.as_secs().max(1);
        let payload = serde_json::to_vec(value)
            .with_context(|| format!("failed to serialize cache value for `{key}`"))?;

        match &self.backend {
            CacheBackend::Disabled(store) => store.set(key, payload, ttl_seconds).await,
            CacheBackend::Redis(store) => store.set(key, payload, ttl_seconds).await,
            #[cfg(test)]
            CacheBackend::Memory(store) => store.set(key, payload).await,
        }
    }

    pub async fn del(&self, key: &str) -> anyhow::Result<()> {
        match &self.backend {
            CacheBackend::Disabled(store) => store.del(key).await,
            CacheBackend::Redis(store) => store.del(key).await,
            #[cfg(test)]
            CacheBackend::Memory(store) => store.del(key).await,
        }
    }

    /// Return the cached value for `key`, or run `loader` and cache its result.
    /// Cache failures are logged and fall through to the loader.
    pub async fn get_or_load_json<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        match self.get_json::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(
                ?e,
                cache_key = key,
                "cache get failed; falling back to database"
            ),
        }

        let loaded = loader().await?;

        if let Err(e) = self.set_json(key, &loaded, ttl).await {
            warn!(
                ?e,
                cache_key = key,
                "cache set failed; returning database value"
            );
        }

        Ok(loaded)
    }
}

pub fn guild_config_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("guild:{guild_id}:config"))
}

pub fn snippet_names_key(cache: &CacheService, guild_id: u64, table: &str) -> String {
    cache.key(format!("guild:{guild_id}:{table}:names"))
}

pub fn filter_words_key(cache: &CacheService, guild_id: u64) -> String {
    cache.key(format!("guild:{guild_id}:filter_words"))
}

pub async fn invalidate_filter_words(cache: &CacheService, guild_id: u64) -> anyhow::Result<()> {
    cache.del(&filter_words_key(cache, guild_id)).await
}

#[cfg(test)]
mod memory_store {
    use std::collections::HashMap;
    use std::sync::Arc;

    use tokio::sync::Mutex;

    #[derive(Clone, Debug, Default)]
    pub struct MemoryCacheStore {
        entries: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MemoryCacheStore {
        pub async fn get(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
            Ok(self.entries.lock().await.get(key).cloned())
        }

        pub async fn set(&self, key: &str, value: Vec<u8>) -> anyhow::Result<()> {
            self.entries.lock().await.insert(key.to_owned(), value);
            Ok(())
        }

        pub async fn del(&self, key: &str) -> anyhow::Result<()> {
            self.entries.lock().await.remove(key);
            Ok(())
        }
    }
}
