//! Local caching of API data.
//!
//! This module provides:
//! - A SQLite entity cache keyed by entity type and integer id
//! - A cache-aside layer (`try local`, then `fetch remote and store`)
//! - Persisted pagination cursors
//! - The stored record shapes and their conversions

mod cursor;
mod layer;
pub mod records;
mod storage;
mod traits;

pub use cursor::{CursorStore, PageCursor};
pub use layer::CacheLayer;
pub use records::{CharacterRecord, LocationRecord};
pub use storage::{CacheStorage, CachedEntity, SqliteStorage};
pub use traits::{CacheResult, CacheSource, Cacheable};
