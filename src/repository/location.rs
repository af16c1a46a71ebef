use async_trait::async_trait;
use color_eyre::Result;
use std::sync::Arc;
use tracing::debug;

use crate::api::LocationApi;
use crate::cache::{CacheLayer, CacheStorage, LocationRecord};
use crate::error::RepositoryError;
use crate::models::Location;

/// Access to locations.
#[async_trait]
pub trait LocationRepository: Send + Sync {
  /// Details of a location. Fails with [`RepositoryError::NotFound`] when
  /// neither the cache nor the API knows it.
  async fn get_location(&self, id: i64) -> Result<Location>;
}

#[async_trait]
impl<T: LocationRepository + ?Sized> LocationRepository for Arc<T> {
  async fn get_location(&self, id: i64) -> Result<Location> {
    (**self).get_location(id).await
  }
}

/// Cache-first location repository.
pub struct CachedLocationRepository<A: LocationApi, S: CacheStorage> {
  api: A,
  cache: CacheLayer<S>,
}

impl<A: LocationApi, S: CacheStorage> CachedLocationRepository<A, S> {
  pub fn new(api: A, storage: Arc<S>) -> Self {
    Self {
      api,
      cache: CacheLayer::new(storage),
    }
  }
}

#[async_trait]
impl<A: LocationApi, S: CacheStorage> LocationRepository for CachedLocationRepository<A, S> {
  async fn get_location(&self, id: i64) -> Result<Location> {
    let result = self
      .cache
      .fetch_one(id, || async {
        self
          .api
          .get_location(id)
          .await
          .map(|response| response.map(LocationRecord::from))
      })
      .await?
      .ok_or(RepositoryError::NotFound {
        entity: "location",
        id,
      })?;

    debug!("location {} resolved from {:?}", id, result.source);
    Ok(result.data.into_model())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{CacheSource, SqliteStorage};
  use crate::repository::testing::{api_location, memory_storage, FakeApi};
  use std::sync::atomic::Ordering;

  fn repository(api: &Arc<FakeApi>) -> CachedLocationRepository<Arc<FakeApi>, SqliteStorage> {
    CachedLocationRepository::new(Arc::clone(api), memory_storage())
  }

  #[tokio::test]
  async fn test_cached_location_skips_remote() {
    let api = FakeApi::new();
    let storage = memory_storage();
    storage
      .store_entity(&LocationRecord::from(api_location(3, &[8, 14])))
      .unwrap();
    let repo = CachedLocationRepository::new(Arc::clone(&api), storage);

    let location = repo.get_location(3).await.unwrap();
    assert_eq!(location.name, "Citadel of Ricks");
    assert_eq!(api.location_calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_remote_location_fetched_once_then_cached() {
    let api = FakeApi::new();
    api.add_location(api_location(3, &[8, 14]));
    let repo = repository(&api);

    let first = repo.get_location(3).await.unwrap();
    let second = repo.get_location(3).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(api.location_calls.load(Ordering::SeqCst), 1);

    let cached = repo.cache.fetch_one::<LocationRecord, _, _>(3, || async { Ok(None) }).await;
    assert_eq!(cached.unwrap().unwrap().source, CacheSource::Cache);
  }

  #[tokio::test]
  async fn test_round_trip_preserves_fields_and_resident_order() {
    let api = FakeApi::new();
    api.add_location(api_location(3, &[245, 8, 14, 1]));
    let repo = repository(&api);

    let fetched = repo.get_location(3).await.unwrap();
    api.set_failing(true);
    let cached = repo.get_location(3).await.unwrap();

    assert_eq!(cached.id, 3);
    assert_eq!(cached.name, fetched.name);
    assert_eq!(cached.location_type, "Space station");
    assert_eq!(cached.dimension, "unknown");
    assert_eq!(cached.resident_ids(), vec![245, 8, 14, 1]);
    assert_eq!(cached.resident_ids(), fetched.resident_ids());
  }

  #[tokio::test]
  async fn test_unknown_location_is_not_found() {
    let api = FakeApi::new();
    let repo = repository(&api);

    let err = repo.get_location(404).await.unwrap_err();
    assert_eq!(
      err.downcast_ref::<RepositoryError>(),
      Some(&RepositoryError::NotFound {
        entity: "location",
        id: 404
      })
    );
  }

  #[tokio::test]
  async fn test_network_failure_propagates() {
    let api = FakeApi::new();
    api.set_failing(true);
    let repo = repository(&api);

    let err = repo.get_location(3).await.unwrap_err();
    assert!(err.downcast_ref::<RepositoryError>().is_none());
    assert!(err.to_string().contains("500"));
  }
}
