use crate::cache::ObjectCache;
use crate::cache::object_cache::moka;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| {
        let mut builtin = HashMap::new();
        builtin.insert(moka::PLUGIN_NAME.to_string(), moka::constructor());
        RwLock::new(builtin)
    });

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    let name = name.into();
    let mut registry = OBJECT_CACHE_REGISTRY
        .write()
        .expect("Cache registry lock poisoned");
    registry.insert(name, constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .read()
        .expect("Cache registry lock poisoned")
        .get(name)
        .cloned()
}

pub fn debug_object_cache_registry() {
    let registry = OBJECT_CACHE_REGISTRY
        .read()
        .expect("Cache registry lock poisoned");
    if registry.is_empty() {
        tracing::debug!("No object cache plugins registered.");
    } else {
        tracing::debug!("Registered object cache plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}
