use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_settings(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    /// 不依赖全局配置的构造方式
    pub fn with_settings(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            max_capacity, ttl_secs
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // Moka 使用构建时的全局 TTL，单条 TTL 被忽略
        self.inner.insert(key, value).await;
        if ttl != 0 {
            debug!("Moka cache ignores per-item TTL, using global TTL configuration");
        }
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}
