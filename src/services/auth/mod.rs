//! 鉴权网关
//!
//! 把 Bearer 令牌解析为 [`UserContext`]：校验签名与类型后，以存储中的用户角色为准。
//! 解析结果按 token 缓存，缓存只是加速手段，未命中时总会回源存储。

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::{AttendSysError, Result};
use crate::models::auth::UserContext;
use crate::models::users::entities::UserRole;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

const CACHE_KEY_PREFIX: &str = "auth:";

#[derive(Clone)]
pub struct AuthGate {
    secret: String,
    storage: Arc<dyn Storage>,
    cache: Option<Arc<dyn ObjectCache>>,
    cache_ttl: u64,
}

impl AuthGate {
    pub fn new(secret: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        Self {
            secret: secret.into(),
            storage,
            cache: None,
            cache_ttl: 0,
        }
    }

    pub fn with_cache(mut self, cache: Arc<dyn ObjectCache>, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    /// 解析调用方身份；凭证缺失或无效时返回 Authentication 错误
    pub async fn resolve(&self, credential: Option<&str>) -> Result<UserContext> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AttendSysError::authentication("missing credential"))?;

        let claims = JwtUtils::verify_access_token(&self.secret, token).map_err(|e| {
            info!("JWT token validation failed: {}", e);
            AttendSysError::authentication("invalid credential")
        })?;

        let cache_key = format!("{CACHE_KEY_PREFIX}{token}");
        if let Some(ctx) = self.cached(&cache_key).await {
            return Ok(ctx);
        }

        let user_id = claims
            .user_id()
            .ok_or_else(|| AttendSysError::authentication("invalid subject in credential"))?;

        // 存储不可用属于依赖失败，原样上抛
        let user = self
            .storage
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AttendSysError::authentication("user not found"))?;

        if user.role.to_string() != claims.role {
            debug!(
                "Role in token ({}) differs from stored role ({}) for user {}",
                claims.role, user.role, user.id
            );
        }

        let ctx = UserContext::new(user.id, user.role);
        self.remember(cache_key, &ctx).await;
        Ok(ctx)
    }

    /// 解析身份并要求指定角色
    pub async fn require_role(
        &self,
        credential: Option<&str>,
        role: &UserRole,
    ) -> Result<UserContext> {
        let ctx = self.resolve(credential).await?;
        ctx.require_role(role)?;
        Ok(ctx)
    }

    async fn cached(&self, key: &str) -> Option<UserContext> {
        let cache = self.cache.as_ref()?;
        match cache.get_raw(key).await {
            CacheResult::Found(json) => match serde_json::from_str::<UserContext>(&json) {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    warn!("Dropping undecodable auth cache entry: {}", e);
                    cache.remove(key).await;
                    None
                }
            },
            _ => None,
        }
    }

    async fn remember(&self, key: String, ctx: &UserContext) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Ok(json) = serde_json::to_string(ctx) {
            cache.insert_raw(key, json, self.cache_ttl).await;
        }
    }
}
