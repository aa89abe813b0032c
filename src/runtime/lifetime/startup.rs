use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{AttendSysError, Result};
use crate::services::AuthGate;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

const FALLBACK_CACHE: &str = "moka";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub auth_gate: AuthGate,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        AttendSysError::cache_plugin_not_found(format!(
            "Cache backend '{name}' not found in registry"
        ))
    })?;
    Ok(Arc::from(constructor().await?))
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != FALLBACK_CACHE => {
            warn!("Failed to create {} cache: {}", cache_type, e);
            warn!("Falling back to default memory cache");
            build_cache(FALLBACK_CACHE).await
        }
        Err(e) => Err(e),
    }
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和鉴权网关
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 已安装过时返回 Err，可忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    // 鉴权结果按 token 缓存
    let auth_gate = AuthGate::new(config.jwt.secret.clone(), storage.clone())
        .with_cache(cache, config.cache.default_ttl);

    Ok(StartupContext { storage, auth_gate })
}
