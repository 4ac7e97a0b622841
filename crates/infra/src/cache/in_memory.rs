use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{Cache, CacheError};

/// Process-local cache. Expired entries are dropped on access and swept on every `put`.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for InMemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let now = Instant::now();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    fn forget(&self, key: &str) -> Result<bool, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries
            .remove(key)
            .is_some_and(|(_, expires_at)| expires_at > Instant::now()))
    }

    fn take_if(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        let matches = match entries.get(key) {
            Some((value, expires_at)) => value == expected && *expires_at > Instant::now(),
            None => return Ok(false),
        };
        if matches {
            entries.remove(key);
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_forgets() {
        let cache = InMemoryCache::new();
        cache.put("k", "v", Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));
        assert!(cache.forget("k").unwrap());
        assert_eq!(cache.get("k").unwrap(), None);
        assert!(!cache.forget("k").unwrap());
    }

    #[test]
    fn expired_entries_are_invisible() {
        let cache = InMemoryCache::new();
        cache.put("k", "v", Duration::ZERO).unwrap();
        assert_eq!(cache.get("k").unwrap(), None);
    }

    #[test]
    fn put_sweeps_expired_entries() {
        let cache = InMemoryCache::new();
        for i in 0..1_000 {
            cache.put(&format!("stale:{i}"), "v", Duration::ZERO).unwrap();
        }
        cache.put("live", "v", Duration::from_secs(60)).unwrap();

        let entries = cache.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries.contains_key("live"));
    }

    #[test]
    fn take_if_removes_only_a_matching_value() {
        let cache = InMemoryCache::new();
        cache.put("k", "v", Duration::from_secs(60)).unwrap();

        assert!(!cache.take_if("k", "other").unwrap());
        assert_eq!(cache.get("k").unwrap().as_deref(), Some("v"));
        assert!(cache.take_if("k", "v").unwrap());
        assert!(!cache.take_if("k", "v").unwrap());
        assert!(!cache.take_if("missing", "v").unwrap());
    }
}
