use std::time::Duration;

use redis::Commands;

use super::{Cache, CacheError};

const TAKE_IF_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
end
return 0
"#;

/// Redis-backed cache (string values with `EX` expiry).
#[derive(Debug, Clone)]
pub struct RedisCache {
    client: redis::Client,
}

impl RedisCache {
    pub fn new(redis_url: impl AsRef<str>) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        Ok(Self { client })
    }

    fn connection(&self) -> Result<redis::Connection, CacheError> {
        self.client
            .get_connection()
            .map_err(|e| CacheError::Unavailable(e.to_string()))
    }
}

impl Cache for RedisCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection()?;
        conn.get(key).map_err(|e| CacheError::Backend(e.to_string()))
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection()?;
        redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query::<()>(&mut conn)
            .map_err(|e| CacheError::Backend(e.to_string()))
    }

    fn forget(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection()?;
        let removed: i64 = conn.del(key).map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(removed > 0)
    }

    fn take_if(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        let mut conn = self.connection()?;
        let removed: i64 = redis::Script::new(TAKE_IF_SCRIPT)
            .key(key)
            .arg(expected)
            .invoke(&mut conn)
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(removed > 0)
    }
}
