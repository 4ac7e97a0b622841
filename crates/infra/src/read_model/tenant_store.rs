use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::RwLock;

use facilityhub_core::TenantId;

/// Tenant-isolated key/value storage backing the in-memory repositories.
pub trait TenantStore<K, V>: Send + Sync {
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V>;
    fn upsert(&self, tenant_id: TenantId, key: K, value: V);
    fn remove(&self, tenant_id: TenantId, key: &K) -> Option<V>;
    fn list(&self, tenant_id: TenantId) -> Vec<V>;

    /// Upsert unless some row of the tenant satisfies `conflicts`. The check and
    /// the write happen under one lock. Returns whether the value was stored.
    fn upsert_unless(
        &self,
        tenant_id: TenantId,
        key: K,
        value: V,
        conflicts: &dyn Fn(&K, &V) -> bool,
    ) -> bool;
}

impl<K, V, S> TenantStore<K, V> for Arc<S>
where
    S: TenantStore<K, V> + ?Sized,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        (**self).get(tenant_id, key)
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        (**self).upsert(tenant_id, key, value)
    }

    fn remove(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        (**self).remove(tenant_id, key)
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        (**self).list(tenant_id)
    }

    fn upsert_unless(
        &self,
        tenant_id: TenantId,
        key: K,
        value: V,
        conflicts: &dyn Fn(&K, &V) -> bool,
    ) -> bool {
        (**self).upsert_unless(tenant_id, key, value, conflicts)
    }
}

/// `RwLock<HashMap>` store keyed by `(tenant, key)`. `list` is ordered by key.
#[derive(Debug)]
pub struct InMemoryTenantStore<K, V> {
    inner: RwLock<HashMap<(TenantId, K), V>>,
}

impl<K, V> InMemoryTenantStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryTenantStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TenantStore<K, V> for InMemoryTenantStore<K, V>
where
    K: Clone + Eq + Hash + Ord + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(&(tenant_id, key.clone())).cloned()
    }

    fn upsert(&self, tenant_id: TenantId, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert((tenant_id, key), value);
        }
    }

    fn remove(&self, tenant_id: TenantId, key: &K) -> Option<V> {
        let mut map = self.inner.write().ok()?;
        map.remove(&(tenant_id, key.clone()))
    }

    fn list(&self, tenant_id: TenantId) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        let mut rows: Vec<(&K, &V)> = map
            .iter()
            .filter_map(|((t, k), v)| (*t == tenant_id).then_some((k, v)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows.into_iter().map(|(_, v)| v.clone()).collect()
    }

    fn upsert_unless(
        &self,
        tenant_id: TenantId,
        key: K,
        value: V,
        conflicts: &dyn Fn(&K, &V) -> bool,
    ) -> bool {
        let Ok(mut map) = self.inner.write() else {
            return false;
        };
        if map
            .iter()
            .any(|((t, k), v)| *t == tenant_id && conflicts(k, v))
        {
            return false;
        }
        map.insert((tenant_id, key), value);
        true
    }
}
