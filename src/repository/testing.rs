//! In-memory API doubles for repository tests.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::{
  ApiCharacter, ApiCharacterPage, ApiLocation, ApiPageInfo, ApiPlaceRef, CharacterApi, LocationApi,
};
use crate::cache::SqliteStorage;

const BASE: &str = "https://rickandmortyapi.com/api";

pub fn api_character(id: i64, name: &str, location_id: Option<i64>) -> ApiCharacter {
  ApiCharacter {
    id,
    name: name.to_string(),
    status: "Alive".to_string(),
    species: "Human".to_string(),
    character_type: String::new(),
    gender: "Male".to_string(),
    origin: ApiPlaceRef {
      name: "Earth (C-137)".to_string(),
      url: format!("{}/location/1", BASE),
    },
    location: ApiPlaceRef {
      name: if location_id.is_some() {
        "Citadel of Ricks".to_string()
      } else {
        "unknown".to_string()
      },
      url: location_id
        .map(|id| format!("{}/location/{}", BASE, id))
        .unwrap_or_default(),
    },
    image: format!("{}/character/avatar/{}.jpeg", BASE, id),
    episode: Vec::new(),
    url: format!("{}/character/{}", BASE, id),
    created: "2017-11-04T18:48:46.250Z".to_string(),
  }
}

pub fn api_location(id: i64, residents: &[i64]) -> ApiLocation {
  ApiLocation {
    id,
    name: "Citadel of Ricks".to_string(),
    location_type: "Space station".to_string(),
    dimension: "unknown".to_string(),
    residents: residents
      .iter()
      .map(|r| format!("{}/character/{}", BASE, r))
      .collect(),
    url: format!("{}/location/{}", BASE, id),
    created: "2017-11-10T13:08:13.191Z".to_string(),
  }
}

pub fn api_page(characters: Vec<ApiCharacter>, next: Option<u32>) -> ApiCharacterPage {
  ApiCharacterPage {
    info: ApiPageInfo {
      count: characters.len() as u64,
      pages: 0,
      next: next.map(|page| format!("{}/character?page={}", BASE, page)),
      prev: None,
    },
    results: characters,
  }
}

pub fn memory_storage() -> Arc<SqliteStorage> {
  Arc::new(SqliteStorage::open_in_memory().unwrap())
}

/// Fake remote API with canned data and per-endpoint call counters.
#[derive(Default)]
pub struct FakeApi {
  pub characters: Mutex<HashMap<i64, ApiCharacter>>,
  pub pages: Mutex<HashMap<u32, ApiCharacterPage>>,
  pub locations: Mutex<HashMap<i64, ApiLocation>>,
  pub fail: AtomicBool,
  pub page_calls: AtomicUsize,
  pub character_calls: AtomicUsize,
  pub batch_calls: AtomicUsize,
  pub location_calls: AtomicUsize,
  pub requested_pages: Mutex<Vec<u32>>,
}

impl FakeApi {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  pub fn add_character(&self, character: ApiCharacter) {
    self.characters.lock().unwrap().insert(character.id, character);
  }

  pub fn add_page(&self, page: u32, body: ApiCharacterPage) {
    self.pages.lock().unwrap().insert(page, body);
  }

  pub fn add_location(&self, location: ApiLocation) {
    self.locations.lock().unwrap().insert(location.id, location);
  }

  pub fn set_failing(&self, fail: bool) {
    self.fail.store(fail, Ordering::SeqCst);
  }

  fn check(&self) -> Result<()> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(eyre!("GET failed with status 500 Internal Server Error"));
    }
    Ok(())
  }
}

#[async_trait]
impl CharacterApi for FakeApi {
  async fn get_characters(&self, page: u32) -> Result<ApiCharacterPage> {
    self.page_calls.fetch_add(1, Ordering::SeqCst);
    self.requested_pages.lock().unwrap().push(page);
    self.check()?;
    self
      .pages
      .lock()
      .unwrap()
      .get(&page)
      .cloned()
      .ok_or_else(|| eyre!("GET character?page={} failed with status 404", page))
  }

  async fn get_character(&self, id: i64) -> Result<Option<ApiCharacter>> {
    self.character_calls.fetch_add(1, Ordering::SeqCst);
    self.check()?;
    Ok(self.characters.lock().unwrap().get(&id).cloned())
  }

  async fn get_characters_by_ids(&self, ids: &[i64]) -> Result<Vec<ApiCharacter>> {
    self.batch_calls.fetch_add(1, Ordering::SeqCst);
    self.check()?;
    let characters = self.characters.lock().unwrap();
    Ok(ids.iter().filter_map(|id| characters.get(id).cloned()).collect())
  }
}

#[async_trait]
impl LocationApi for FakeApi {
  async fn get_location(&self, id: i64) -> Result<Option<ApiLocation>> {
    self.location_calls.fetch_add(1, Ordering::SeqCst);
    self.check()?;
    Ok(self.locations.lock().unwrap().get(&id).cloned())
  }
}
