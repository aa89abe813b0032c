//! 对象缓存层
//!
//! 通过插件注册表按名称创建缓存后端，目前内置 Moka（进程内）实现。
//! 鉴权网关用它缓存 token 对应的用户上下文。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
}

/// 声明缓存插件：生成一个返回装箱构造 future 的 `constructor()` 函数，
/// 供注册表按名称挂载。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        pub const PLUGIN_NAME: &str = $name;

        pub fn constructor() -> $crate::cache::register::ObjectCacheConstructor {
            std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                Box::pin(async {
                    match <$ty>::new() {
                        Ok(cache) => Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>),
                        Err(e) => Err($crate::errors::AttendSysError::cache_connection(e)),
                    }
                })
            })
        }
    };
}
