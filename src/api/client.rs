use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::api::api_types::{ApiCharacter, ApiCharacterPage, ApiLocation, OneOrMany};
use crate::config::ApiConfig;

/// Remote source of characters.
#[async_trait]
pub trait CharacterApi: Send + Sync {
  /// Fetch one page of the character listing.
  async fn get_characters(&self, page: u32) -> Result<ApiCharacterPage>;

  /// Fetch a single character. `None` when the API answers with `null`.
  async fn get_character(&self, id: i64) -> Result<Option<ApiCharacter>>;

  /// Fetch several characters in one batched request.
  async fn get_characters_by_ids(&self, ids: &[i64]) -> Result<Vec<ApiCharacter>>;
}

/// Remote source of locations.
#[async_trait]
pub trait LocationApi: Send + Sync {
  /// Fetch a single location. `None` when the API answers with `null`.
  async fn get_location(&self, id: i64) -> Result<Option<ApiLocation>>;
}

#[async_trait]
impl<T: CharacterApi + ?Sized> CharacterApi for Arc<T> {
  async fn get_characters(&self, page: u32) -> Result<ApiCharacterPage> {
    (**self).get_characters(page).await
  }

  async fn get_character(&self, id: i64) -> Result<Option<ApiCharacter>> {
    (**self).get_character(id).await
  }

  async fn get_characters_by_ids(&self, ids: &[i64]) -> Result<Vec<ApiCharacter>> {
    (**self).get_characters_by_ids(ids).await
  }
}

#[async_trait]
impl<T: LocationApi + ?Sized> LocationApi for Arc<T> {
  async fn get_location(&self, id: i64) -> Result<Option<ApiLocation>> {
    (**self).get_location(id).await
  }
}

/// Rick and Morty API client
#[derive(Clone)]
pub struct RickApiClient {
  client: reqwest::Client,
  base_url: Url,
}

impl RickApiClient {
  pub fn new(config: &ApiConfig) -> Result<Self> {
    // Url::join drops the last segment unless the base ends with a slash
    let mut raw = config.url.trim().to_string();
    if !raw.ends_with('/') {
      raw.push('/');
    }
    let base_url =
      Url::parse(&raw).map_err(|e| eyre!("Invalid API url {}: {}", config.url, e))?;

    let mut builder = reqwest::Client::builder().user_agent(concat!(
      env!("CARGO_PKG_NAME"),
      "/",
      env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { client, base_url })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// GET a path relative to the base url and decode the JSON body.
  /// Anything other than 200 OK is an error.
  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    let url = self
      .base_url
      .join(path)
      .map_err(|e| eyre!("Invalid request path {}: {}", path, e))?;

    debug!("GET {}", url);

    let response = self
      .client
      .get(url.clone())
      .send()
      .await
      .map_err(|e| eyre!("Request to {} failed: {}", url, e))?;

    let status = response.status();
    if status != StatusCode::OK {
      return Err(eyre!("GET {} failed with status {}", url, status));
    }

    response
      .json::<T>()
      .await
      .map_err(|e| eyre!("Failed to parse response from {}: {}", url, e))
  }
}

#[async_trait]
impl CharacterApi for RickApiClient {
  async fn get_characters(&self, page: u32) -> Result<ApiCharacterPage> {
    self.get_json(&format!("character?page={}", page)).await
  }

  async fn get_character(&self, id: i64) -> Result<Option<ApiCharacter>> {
    self.get_json(&format!("character/{}", id)).await
  }

  async fn get_characters_by_ids(&self, ids: &[i64]) -> Result<Vec<ApiCharacter>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let joined = ids
      .iter()
      .map(|id| id.to_string())
      .collect::<Vec<_>>()
      .join(",");

    let characters: OneOrMany<ApiCharacter> =
      self.get_json(&format!("character/{}", joined)).await?;

    Ok(characters.into_vec())
  }
}

#[async_trait]
impl LocationApi for RickApiClient {
  async fn get_location(&self, id: i64) -> Result<Option<ApiLocation>> {
    self.get_json(&format!("location/{}", id)).await
  }
}
