//! HTTP access to the Rick and Morty API.

pub mod api_types;
mod client;

pub use api_types::{ApiCharacter, ApiCharacterPage, ApiLocation, ApiPageInfo, ApiPlaceRef};
pub use client::{CharacterApi, LocationApi, RickApiClient};
