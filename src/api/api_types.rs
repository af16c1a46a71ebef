//! Serde-deserializable types matching the Rick and Morty API responses.
//!
//! These are kept apart from the persistence records and domain types so the
//! wire format can change without touching the cache.

use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::cache::PageCursor;

// ============================================================================
// Common nested field types
// ============================================================================

/// `{ "name": ..., "url": ... }` reference used for origin and location
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiPlaceRef {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub url: String,
}

// ============================================================================
// Character endpoints
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCharacter {
  pub id: i64,
  pub name: String,
  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub species: String,
  #[serde(rename = "type", default)]
  pub character_type: String,
  #[serde(default)]
  pub gender: String,
  #[serde(default)]
  pub origin: ApiPlaceRef,
  #[serde(default)]
  pub location: ApiPlaceRef,
  #[serde(default)]
  pub image: String,
  #[serde(default)]
  pub episode: Vec<String>,
  #[serde(default)]
  pub url: String,
  #[serde(default)]
  pub created: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiPageInfo {
  #[serde(default)]
  pub count: u64,
  #[serde(default)]
  pub pages: u64,
  pub next: Option<String>,
  pub prev: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiCharacterPage {
  #[serde(default)]
  pub info: ApiPageInfo,
  #[serde(default)]
  pub results: Vec<ApiCharacter>,
}

impl ApiCharacterPage {
  /// Cursor for the page after this one.
  pub fn next_cursor(&self) -> PageCursor {
    next_page_cursor(self.info.next.as_deref())
  }
}

/// `character/{ids}` answers with a bare object when given a single id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
  Many(Vec<T>),
  One(T),
}

impl<T> OneOrMany<T> {
  pub fn into_vec(self) -> Vec<T> {
    match self {
      OneOrMany::Many(items) => items,
      OneOrMany::One(item) => vec![item],
    }
  }
}

// ============================================================================
// Location endpoint
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ApiLocation {
  pub id: i64,
  pub name: String,
  #[serde(rename = "type", default)]
  pub location_type: String,
  #[serde(default)]
  pub dimension: String,
  #[serde(default)]
  pub residents: Vec<String>,
  #[serde(default)]
  pub url: String,
  #[serde(default)]
  pub created: String,
}

// ============================================================================
// Helpers
// ============================================================================

/// Extract a resource id from the last path segment of an API URL
/// (e.g. `https://rickandmortyapi.com/api/location/3` -> 3).
/// Empty or malformed URLs have no id.
pub fn id_from_url(url: &str) -> Option<i64> {
  let trimmed = url.trim().trim_end_matches('/');
  if trimmed.is_empty() {
    return None;
  }
  trimmed.rsplit('/').next()?.parse().ok()
}

/// Base for resolving `info.next` links that are not absolute URLs
const LINK_BASE: &str = "http://localhost/";

/// Turn the `info.next` link of a character page into the cursor to persist.
///
/// Relative links (`character?page=7`, `?page=7`) are read the same as
/// absolute ones. A missing link, or one without a usable `page` parameter,
/// means there is nothing left to fetch.
pub fn next_page_cursor(next: Option<&str>) -> PageCursor {
  let Some(next) = next else {
    return PageCursor::Exhausted;
  };

  let page = Url::parse(LINK_BASE)
    .and_then(|base| base.join(next))
    .ok()
    .and_then(|url| {
      url
        .query_pairs()
        .find(|(k, _)| k == "page")
        .map(|(_, v)| v.into_owned())
    });

  match page.as_deref().map(str::parse::<u32>) {
    Some(Ok(page)) if page > 0 => PageCursor::Next(page),
    _ => {
      warn!("No usable page parameter in next link: {}", next);
      PageCursor::Exhausted
    }
  }
}
