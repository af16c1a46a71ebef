//! Cache layer that orchestrates local lookups with network fetching.

use color_eyre::Result;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use super::storage::CacheStorage;
use super::traits::{CacheResult, Cacheable};

/// Cache-aside access to a storage backend.
///
/// The local store is only a cache: cached entries are served as-is, and
/// anything fetched from the network overwrites what was stored.
pub struct CacheLayer<S: CacheStorage> {
  storage: Arc<S>,
}

impl<S: CacheStorage> CacheLayer<S> {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: Arc<S>) -> Self {
    Self { storage }
  }

  /// Fetch a single entity with cache-first strategy.
  ///
  /// 1. Check cache - if present, return it without calling `fetcher`
  /// 2. Otherwise fetch from network
  /// 3. Store whatever the network returned
  ///
  /// `Ok(None)` means neither the cache nor the network had the entity.
  pub async fn fetch_one<T, F, Fut>(&self, id: i64, fetcher: F) -> Result<Option<CacheResult<T>>>
  where
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
  {
    if let Some(cached) = self.storage.get_entity::<T>(id)? {
      debug!("{} {} served from cache", T::entity_type(), id);
      return Ok(Some(CacheResult::from_cache(cached.entity, cached.cached_at)));
    }

    debug!("{} {} not cached, fetching", T::entity_type(), id);
    match fetcher().await? {
      Some(data) => {
        self.storage.store_entity(&data)?;
        Ok(Some(CacheResult::from_network(data)))
      }
      None => Ok(None),
    }
  }

  /// Upsert fetched entities.
  pub fn store_all<T: Cacheable>(&self, entities: &[T]) -> Result<()> {
    self.storage.store_entities(entities)
  }

  /// Every cached entity of a type, ordered by id.
  pub fn list<T: Cacheable>(&self) -> Result<Vec<T>> {
    self.storage.list_entities()
  }
}
