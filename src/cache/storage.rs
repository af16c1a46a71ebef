//! Cache storage trait and SQLite implementation.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::traits::Cacheable;

/// A single cached entity.
#[derive(Debug, Clone)]
pub struct CachedEntity<T> {
  /// The cached entity
  pub entity: T,
  /// When the entity was last written
  pub cached_at: DateTime<Utc>,
}

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync {
  /// Get a single entity by primary key.
  fn get_entity<T: Cacheable>(&self, id: i64) -> Result<Option<CachedEntity<T>>>;

  /// Insert or replace a single entity.
  fn store_entity<T: Cacheable>(&self, entity: &T) -> Result<()>;

  /// Insert or replace several entities in one transaction.
  fn store_entities<T: Cacheable>(&self, entities: &[T]) -> Result<()>;

  /// All cached entities of a type, ordered by id.
  fn list_entities<T: Cacheable>(&self) -> Result<Vec<T>>;

  /// Read an integer preference.
  fn get_preference(&self, scope: &str, key: &str) -> Result<Option<i64>>;

  /// Write an integer preference, replacing any previous value.
  fn set_preference(&self, scope: &str, key: &str, value: i64) -> Result<()>;
}

/// SQLite-based cache storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open the cache at `path`, or at the default location when `None`.
  pub fn open(path: Option<&Path>) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    Self::with_connection(conn)
  }

  /// Open a throwaway in-memory cache.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory cache: {}", e))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;
    Ok(storage)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("rickdex").join("cache.db"))
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
    self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))
  }

  /// Create cache tables if they are missing.
  fn run_migrations(&self) -> Result<()> {
    let conn = self.lock()?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
-- Entity cache (stores serialized JSON records)
CREATE TABLE IF NOT EXISTS entity_cache (
    entity_type TEXT NOT NULL,
    entity_id INTEGER NOT NULL,
    data BLOB NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (entity_type, entity_id)
);

-- Small integer settings, e.g. pagination cursors
CREATE TABLE IF NOT EXISTS preferences (
    scope TEXT NOT NULL,
    name TEXT NOT NULL,
    value INTEGER NOT NULL,
    PRIMARY KEY (scope, name)
);
"#;

fn upsert_entity<T: Cacheable>(conn: &Connection, entity: &T) -> Result<()> {
  let data = serde_json::to_vec(entity).map_err(|e| eyre!("Failed to serialize entity: {}", e))?;

  conn
    .execute(
      "INSERT OR REPLACE INTO entity_cache (entity_type, entity_id, data, cached_at)
       VALUES (?, ?, ?, datetime('now'))",
      params![T::entity_type(), entity.cache_id(), data],
    )
    .map_err(|e| eyre!("Failed to store {} {}: {}", T::entity_type(), entity.cache_id(), e))?;

  Ok(())
}

impl CacheStorage for SqliteStorage {
  fn get_entity<T: Cacheable>(&self, id: i64) -> Result<Option<CachedEntity<T>>> {
    let conn = self.lock()?;
    let entity_type = T::entity_type();

    let result: Option<(Vec<u8>, String)> = conn
      .query_row(
        "SELECT data, cached_at FROM entity_cache
         WHERE entity_type = ? AND entity_id = ?",
        params![entity_type, id],
        |row| Ok((row.get(0)?, row.get(1)?)),
      )
      .optional()
      .map_err(|e| eyre!("Failed to query {} {}: {}", entity_type, id, e))?;

    match result {
      Some((data, cached_at_str)) => {
        let entity: T = serde_json::from_slice(&data)
          .map_err(|e| eyre!("Failed to deserialize {} {}: {}", entity_type, id, e))?;
        let cached_at = parse_datetime(&cached_at_str)?;
        Ok(Some(CachedEntity { entity, cached_at }))
      }
      None => Ok(None),
    }
  }

  fn store_entity<T: Cacheable>(&self, entity: &T) -> Result<()> {
    let conn = self.lock()?;
    upsert_entity(&conn, entity)
  }

  fn store_entities<T: Cacheable>(&self, entities: &[T]) -> Result<()> {
    let mut conn = self.lock()?;

    let tx = conn
      .transaction()
      .map_err(|e| eyre!("Failed to begin transaction: {}", e))?;

    for entity in entities {
      upsert_entity(&tx, entity)?;
    }

    tx.commit()
      .map_err(|e| eyre!("Failed to commit transaction: {}", e))?;

    Ok(())
  }

  fn list_entities<T: Cacheable>(&self) -> Result<Vec<T>> {
    let conn = self.lock()?;
    let entity_type = T::entity_type();

    let mut stmt = conn
      .prepare(
        "SELECT data FROM entity_cache
         WHERE entity_type = ?
         ORDER BY entity_id",
      )
      .map_err(|e| eyre!("Failed to prepare entity query: {}", e))?;

    let rows: Vec<Vec<u8>> = stmt
      .query_map(params![entity_type], |row| row.get(0))
      .map_err(|e| eyre!("Failed to query entities: {}", e))?
      .collect::<rusqlite::Result<_>>()
      .map_err(|e| eyre!("Failed to read entities: {}", e))?;

    rows
      .iter()
      .map(|data| {
        serde_json::from_slice(data).map_err(|e| eyre!("Failed to deserialize {}: {}", entity_type, e))
      })
      .collect()
  }

  fn get_preference(&self, scope: &str, key: &str) -> Result<Option<i64>> {
    let conn = self.lock()?;

    conn
      .query_row(
        "SELECT value FROM preferences WHERE scope = ? AND name = ?",
        params![scope, key],
        |row| row.get(0),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read preference {}/{}: {}", scope, key, e))
  }

  fn set_preference(&self, scope: &str, key: &str, value: i64) -> Result<()> {
    let conn = self.lock()?;

    conn
      .execute(
        "INSERT OR REPLACE INTO preferences (scope, name, value) VALUES (?, ?, ?)",
        params![scope, key, value],
      )
      .map_err(|e| eyre!("Failed to write preference {}/{}: {}", scope, key, e))?;

    Ok(())
  }
}

/// Parse a datetime string from SQLite format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  // SQLite stores as "YYYY-MM-DD HH:MM:SS"
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|e| eyre!("Failed to parse datetime '{}': {}", s, e))
}
