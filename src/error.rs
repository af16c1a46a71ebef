use thiserror::Error;

/// Failures raised by the repositories themselves, as opposed to transport
/// or storage errors. They travel inside a `color_eyre::Report`; use
/// `report.downcast_ref::<RepositoryError>()` to tell them apart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
  #[error("{entity} {id} not found")]
  NotFound { entity: &'static str, id: i64 },

  #[error("location not found for character {character_id}")]
  LocationNotFound { character_id: i64 },
}
