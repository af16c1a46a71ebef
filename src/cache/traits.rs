//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Trait for records that can be cached.
///
/// Implementors provide their integer primary key and the entity type name
/// used to partition the cache table.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned {
  /// Primary key of this record (character id, location id)
  fn cache_id(&self) -> i64;

  /// Entity type name for storage organization (e.g., "character", "location")
  fn entity_type() -> &'static str;
}

/// Result from a cache operation, including data and where it came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  /// Create a new cache result from cached data.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fetched from the API and written back to the cache
  Network,
  /// Served from the local cache
  Cache,
}
