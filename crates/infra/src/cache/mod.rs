//! Short-lived key/value cache used for one-time codes.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::config::CacheBackend;

pub mod in_memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use in_memory::InMemoryCache;
#[cfg(feature = "redis")]
pub use self::redis::RedisCache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cache lock poisoned")]
    Poisoned,
}

pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, expiring after `ttl`.
    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Remove `key`. Returns whether a live value was present.
    fn forget(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove `key` only if its live value equals `expected`, as one atomic step.
    /// Returns whether the value matched and was removed.
    fn take_if(&self, key: &str, expected: &str) -> Result<bool, CacheError>;
}

impl<C> Cache for Arc<C>
where
    C: Cache + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        (**self).put(key, value, ttl)
    }

    fn forget(&self, key: &str) -> Result<bool, CacheError> {
        (**self).forget(key)
    }

    fn take_if(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        (**self).take_if(key, expected)
    }
}

/// Build the configured backend.
pub fn connect(backend: &CacheBackend) -> Result<Arc<dyn Cache>, CacheError> {
    match backend {
        CacheBackend::InMemory => Ok(Arc::new(InMemoryCache::new())),
        #[cfg(feature = "redis")]
        CacheBackend::Redis { url } => Ok(Arc::new(RedisCache::new(url)?)),
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis { .. } => Err(CacheError::Unavailable(
            "built without the `redis` feature".to_string(),
        )),
    }
}
