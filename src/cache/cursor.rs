//! Persisted pagination cursor.

use color_eyre::Result;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

use super::storage::CacheStorage;

/// Stored value meaning "no more pages"
pub const EXHAUSTED: i64 = -1;

/// Where the next page fetch should resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCursor {
  /// Page number to fetch next (1-based)
  Next(u32),
  /// The listing has been read to the end
  Exhausted,
}

impl Default for PageCursor {
  fn default() -> Self {
    PageCursor::Next(1)
  }
}

impl PageCursor {
  pub fn from_raw(raw: i64) -> Self {
    match u32::try_from(raw) {
      Ok(page) if page > 0 => PageCursor::Next(page),
      _ => {
        if raw != EXHAUSTED {
          warn!("Treating stored page cursor {} as exhausted", raw);
        }
        PageCursor::Exhausted
      }
    }
  }

  pub fn to_raw(self) -> i64 {
    match self {
      PageCursor::Next(page) => i64::from(page),
      PageCursor::Exhausted => EXHAUSTED,
    }
  }

  pub fn is_exhausted(&self) -> bool {
    matches!(self, PageCursor::Exhausted)
  }
}

impl fmt::Display for PageCursor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PageCursor::Next(page) => write!(f, "page {}", page),
      PageCursor::Exhausted => write!(f, "exhausted"),
    }
  }
}

/// A single persisted cursor, identified by a preference scope and key.
pub struct CursorStore<S: CacheStorage> {
  storage: Arc<S>,
  scope: &'static str,
  key: &'static str,
}

impl<S: CacheStorage> CursorStore<S> {
  pub fn new(storage: Arc<S>, scope: &'static str, key: &'static str) -> Self {
    Self {
      storage,
      scope,
      key,
    }
  }

  /// Snapshot of the stored cursor. Never written means start at page 1.
  pub fn load(&self) -> Result<PageCursor> {
    Ok(
      self
        .storage
        .get_preference(self.scope, self.key)?
        .map(PageCursor::from_raw)
        .unwrap_or_default(),
    )
  }

  pub fn save(&self, cursor: PageCursor) -> Result<()> {
    self
      .storage
      .set_preference(self.scope, self.key, cursor.to_raw())
  }
}
