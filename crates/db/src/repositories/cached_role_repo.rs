//! Cache-aside decorator for any role store.
//!
//! `find_by_id` consults the cache under `"role:<id>"` first and, on a miss,
//! reads the inner store and caches the row for the configured TTL. Cache
//! failures are logged and never fail the call.
//!
//! Deletes invalidate the cached entry whether or not the store delete
//! succeeded, so a failed delete can leave the row in place with its cache
//! entry gone. The next read simply repopulates it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use idm_core::types::DbId;

use super::NamedRepository;
use crate::cache::{cache_key, Cache};
use crate::error::StoreError;
use crate::models::role::Role;

/// Key prefix for cached roles.
pub const ROLE_CACHE_PREFIX: &str = "role";

/// Default lifetime of a cached role.
pub const DEFAULT_ROLE_TTL: Duration = Duration::from_secs(5 * 60);

pub struct CachedRoleRepo<R> {
    inner: R,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl<R> CachedRoleRepo<R> {
    pub fn new(inner: R, cache: Arc<dyn Cache>) -> Self {
        Self::with_ttl(inner, cache, DEFAULT_ROLE_TTL)
    }

    pub fn with_ttl(inner: R, cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { inner, cache, ttl }
    }

    async fn cached(&self, key: &str) -> Option<Role> {
        match self.cache.get(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(key, error = %e, "Discarding undecodable cached role");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Role cache read failed");
                None
            }
        }
    }

    async fn store(&self, key: &str, role: &Role) {
        let result = match serde_json::to_string(role) {
            Ok(raw) => self.cache.set(key, raw, self.ttl).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            tracing::error!(key, error = %e, "Error caching role");
        }
    }

    async fn invalidate(&self, id: DbId) {
        let key = cache_key(ROLE_CACHE_PREFIX, id);
        if let Err(e) = self.cache.delete(&key).await {
            tracing::error!(key, error = %e, "Error invalidating cached role");
        }
    }
}

#[async_trait]
impl<R> NamedRepository for CachedRoleRepo<R>
where
    R: NamedRepository<Entity = Role>,
{
    type Entity = Role;
    type Create = R::Create;
    type Tx = R::Tx;

    async fn create(&self, input: &R::Create) -> Result<DbId, StoreError> {
        self.inner.create(input).await
    }

    async fn create_in_transaction(
        &self,
        tx: &mut R::Tx,
        input: &R::Create,
    ) -> Result<DbId, StoreError> {
        self.inner.create_in_transaction(tx, input).await
    }

    async fn find_by_id(&self, id: DbId) -> Result<Role, StoreError> {
        let key = cache_key(ROLE_CACHE_PREFIX, id);
        if let Some(role) = self.cached(&key).await {
            tracing::debug!(key, "Role cache hit");
            return Ok(role);
        }

        let role = self.inner.find_by_id(id).await?;
        self.store(&key, &role).await;
        Ok(role)
    }

    async fn get_all(&self) -> Result<Vec<Role>, StoreError> {
        self.inner.get_all().await
    }

    async fn find_by_ids(&self, ids: &[DbId]) -> Result<Vec<Role>, StoreError> {
        self.inner.find_by_ids(ids).await
    }

    async fn delete_by_id(&self, id: DbId) -> Result<(), StoreError> {
        let result = self.inner.delete_by_id(id).await;
        self.invalidate(id).await;
        result
    }

    async fn delete_by_ids(&self, ids: &[DbId]) -> Result<(), StoreError> {
        let result = self.inner.delete_by_ids(ids).await;
        if !matches!(result, Err(StoreError::EmptyIds { .. })) {
            for &id in ids {
                self.invalidate(id).await;
            }
        }
        result
    }

    async fn find_by_name(&self, tx: &mut R::Tx, name: &str) -> Result<bool, StoreError> {
        self.inner.find_by_name(tx, name).await
    }

    async fn begin_transaction(&self) -> Result<R::Tx, StoreError> {
        self.inner.begin_transaction().await
    }

    async fn commit(&self, tx: R::Tx) -> Result<(), StoreError> {
        self.inner.commit(tx).await
    }

    async fn rollback(&self, tx: R::Tx) -> Result<(), StoreError> {
        self.inner.rollback(tx).await
    }
}
