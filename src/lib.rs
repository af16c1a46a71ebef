//! Caching client for the Rick and Morty API.
//!
//! Characters and locations are read cache-first from a local SQLite store
//! and fetched from the API on a miss. The character listing is paginated
//! with a persisted cursor.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;

pub use error::RepositoryError;
