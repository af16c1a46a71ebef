use async_trait::async_trait;
use color_eyre::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::CharacterApi;
use crate::cache::{
  CacheLayer, CacheSource, CacheStorage, CharacterRecord, CursorStore, PageCursor,
};
use crate::error::RepositoryError;
use crate::models::{Character, LocationPreview};

use super::feed::{CharacterFeed, FeedPublisher};
use super::location::LocationRepository;

/// Preference scope holding the character pagination cursor
pub const CHARACTER_PREFS: &str = "character_repository_preferences";
/// Preference key of the next character page to load
pub const NEXT_PAGE_KEY: &str = "next_characters_page_to_load";

/// The cursor used by the character listing.
pub fn character_cursor<S: CacheStorage>(storage: Arc<S>) -> CursorStore<S> {
  CursorStore::new(storage, CHARACTER_PREFS, NEXT_PAGE_KEY)
}

/// Access to characters.
#[async_trait]
pub trait CharacterRepository: Send + Sync {
  /// Subscribe to the cached character list. When the cache is empty, the
  /// first page is loaded before the feed is returned.
  async fn get_characters(&self) -> Result<CharacterFeed>;

  /// Fetch and cache the next page, if any. Returns the cursor now stored.
  async fn load_more(&self) -> Result<PageCursor>;

  /// Details of a single character, with its location preview attached.
  async fn get_character(&self, id: i64) -> Result<Character>;

  /// Several characters straight from the API, in one request.
  async fn get_characters_by_ids(&self, ids: &[i64]) -> Result<Vec<Character>>;
}

/// Cache-first character repository.
pub struct CachedCharacterRepository<A, S, L>
where
  A: CharacterApi,
  S: CacheStorage,
  L: LocationRepository,
{
  api: A,
  cache: CacheLayer<S>,
  cursor: CursorStore<S>,
  locations: L,
  feed: FeedPublisher,
}

impl<A, S, L> CachedCharacterRepository<A, S, L>
where
  A: CharacterApi,
  S: CacheStorage,
  L: LocationRepository,
{
  pub fn new(api: A, storage: Arc<S>, cursor: CursorStore<S>, locations: L) -> Result<Self> {
    let cache = CacheLayer::new(storage);
    let initial = cached_characters(&cache)?;

    Ok(Self {
      api,
      cache,
      cursor,
      locations,
      feed: FeedPublisher::new(initial),
    })
  }

  fn refresh_feed(&self) -> Result<()> {
    self.feed.publish(cached_characters(&self.cache)?);
    Ok(())
  }

  /// Resolve the preview of a character's current location.
  ///
  /// A character without a known location fails instead of getting an
  /// empty preview.
  async fn location_preview(
    &self,
    character_id: i64,
    location_id: Option<i64>,
  ) -> Result<LocationPreview> {
    let Some(location_id) = location_id else {
      return Err(RepositoryError::LocationNotFound { character_id }.into());
    };

    let location = self.locations.get_location(location_id).await?;
    Ok(location.preview())
  }
}

fn cached_characters<S: CacheStorage>(cache: &CacheLayer<S>) -> Result<Vec<Character>> {
  Ok(
    cache
      .list::<CharacterRecord>()?
      .into_iter()
      .map(CharacterRecord::into_model)
      .collect(),
  )
}

#[async_trait]
impl<A, S, L> CharacterRepository for CachedCharacterRepository<A, S, L>
where
  A: CharacterApi,
  S: CacheStorage,
  L: LocationRepository,
{
  async fn get_characters(&self) -> Result<CharacterFeed> {
    if cached_characters(&self.cache)?.is_empty() {
      debug!("character cache empty, loading first page");
      self.load_more().await?;
    } else {
      self.refresh_feed()?;
    }

    Ok(self.feed.subscribe())
  }

  async fn load_more(&self) -> Result<PageCursor> {
    let cursor = self.cursor.load()?;
    let PageCursor::Next(page) = cursor else {
      debug!("no more character pages to load");
      return Ok(cursor);
    };

    let response = self.api.get_characters(page).await?;

    let next = response.next_cursor();
    self.cursor.save(next)?;

    let records: Vec<CharacterRecord> = response
      .results
      .into_iter()
      .map(CharacterRecord::from)
      .collect();
    self.cache.store_all(&records)?;

    info!("Loaded {} characters from page {}, next: {}", records.len(), page, next);

    self.refresh_feed()?;
    Ok(next)
  }

  async fn get_character(&self, id: i64) -> Result<Character> {
    let result = self
      .cache
      .fetch_one(id, || async {
        self
          .api
          .get_character(id)
          .await
          .map(|response| response.map(CharacterRecord::from))
      })
      .await?
      .ok_or(RepositoryError::NotFound {
        entity: "character",
        id,
      })?;

    if result.source == CacheSource::Network {
      self.refresh_feed()?;
    }

    let mut character = result.data.into_model();
    let preview = self
      .location_preview(character.id, character.location.id)
      .await?;
    character.location_preview = Some(preview);

    Ok(character)
  }

  async fn get_characters_by_ids(&self, ids: &[i64]) -> Result<Vec<Character>> {
    // A location can have hundreds of residents; one batched request is
    // cheaper than per-id cache lookups plus per-miss requests.
    let characters = self.api.get_characters_by_ids(ids).await?;

    Ok(
      characters
        .into_iter()
        .map(|c| CharacterRecord::from(c).into_model())
        .collect(),
    )
  }
}
