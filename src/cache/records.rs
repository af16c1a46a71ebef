//! Stored shapes of characters and locations, plus conversions from API
//! responses and into domain types.

use serde::{Deserialize, Serialize};

use crate::api::api_types::id_from_url;
use crate::api::{ApiCharacter, ApiLocation};
use crate::models::{Character, CharacterGender, CharacterStatus, Location, PlaceRef};

use super::traits::Cacheable;

/// Id stored when a reference has no usable URL
pub const NO_ID: i64 = -1;

fn id_or_sentinel(url: &str) -> i64 {
  id_from_url(url).unwrap_or(NO_ID)
}

fn sentinel_to_option(id: i64) -> Option<i64> {
  (id != NO_ID).then_some(id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
  pub id: i64,
  pub name: String,
  pub character_type: String,
  pub status: String,
  pub species: String,
  pub gender: String,
  pub image: String,
  pub origin_name: String,
  pub origin_id: i64,
  pub location_name: String,
  pub location_id: i64,
  pub url: String,
  pub created: String,
}

impl From<ApiCharacter> for CharacterRecord {
  fn from(c: ApiCharacter) -> Self {
    CharacterRecord {
      id: c.id,
      name: c.name,
      character_type: c.character_type,
      status: c.status,
      species: c.species,
      gender: c.gender,
      image: c.image,
      origin_id: id_or_sentinel(&c.origin.url),
      origin_name: c.origin.name,
      location_id: id_or_sentinel(&c.location.url),
      location_name: c.location.name,
      url: c.url,
      created: c.created,
    }
  }
}

impl CharacterRecord {
  pub fn into_model(self) -> Character {
    Character {
      id: self.id,
      name: self.name,
      character_type: self.character_type,
      status: CharacterStatus::parse(&self.status),
      species: self.species,
      gender: CharacterGender::parse(&self.gender),
      avatar_url: self.image,
      origin: PlaceRef {
        name: self.origin_name,
        id: sentinel_to_option(self.origin_id),
      },
      location: PlaceRef {
        name: self.location_name,
        id: sentinel_to_option(self.location_id),
      },
      location_preview: None,
    }
  }
}

impl Cacheable for CharacterRecord {
  fn cache_id(&self) -> i64 {
    self.id
  }

  fn entity_type() -> &'static str {
    "character"
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
  pub id: i64,
  pub name: String,
  pub location_type: String,
  pub dimension: String,
  /// Resident character ids separated by ','
  pub residents: String,
  pub url: String,
  pub created: String,
}

impl From<ApiLocation> for LocationRecord {
  fn from(l: ApiLocation) -> Self {
    let residents = l
      .residents
      .iter()
      .filter_map(|url| id_from_url(url))
      .map(|id| id.to_string())
      .collect::<Vec<_>>()
      .join(",");

    LocationRecord {
      id: l.id,
      name: l.name,
      location_type: l.location_type,
      dimension: l.dimension,
      residents,
      url: l.url,
      created: l.created,
    }
  }
}

impl LocationRecord {
  /// Resident ids in stored order. Blank or malformed entries are skipped.
  pub fn resident_ids(&self) -> Vec<i64> {
    self
      .residents
      .split(',')
      .filter_map(|s| s.trim().parse().ok())
      .collect()
  }

  pub fn into_model(self) -> Location {
    let residents = self.resident_ids().into_iter().map(Character::stub).collect();
    Location {
      id: self.id,
      name: self.name,
      location_type: self.location_type,
      dimension: self.dimension,
      residents,
    }
  }
}

impl Cacheable for LocationRecord {
  fn cache_id(&self) -> i64 {
    self.id
  }

  fn entity_type() -> &'static str {
    "location"
  }
}
