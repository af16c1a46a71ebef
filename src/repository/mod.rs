//! Repositories coordinating the remote API with the local cache.
//!
//! - `LocationRepository` - cache-first location lookup
//! - `CharacterRepository` - paginated listing, cache-first detail lookup
//!   with a location preview, and batched by-id fetches
//!
//! Consumers depend on the traits; the `Cached*` types are the
//! implementations backed by [`crate::cache`].

mod character;
mod feed;
mod location;

#[cfg(test)]
pub(crate) mod testing;

pub use character::{
  character_cursor, CachedCharacterRepository, CharacterRepository, CHARACTER_PREFS,
  NEXT_PAGE_KEY,
};
pub use feed::CharacterFeed;
pub use location::{CachedLocationRepository, LocationRepository};
