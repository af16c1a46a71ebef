//! Domain types handed to consumers of the repositories.

/// Life status of a character
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharacterStatus {
  Alive,
  Dead,
  #[default]
  Unknown,
}

impl CharacterStatus {
  /// Lenient parse of the API value; anything unrecognized is `Unknown`.
  pub fn parse(s: &str) -> Self {
    match s.trim().to_lowercase().as_str() {
      "alive" => Self::Alive,
      "dead" => Self::Dead,
      _ => Self::Unknown,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Alive => "Alive",
      Self::Dead => "Dead",
      Self::Unknown => "unknown",
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharacterGender {
  Female,
  Male,
  Genderless,
  #[default]
  Unknown,
}

impl CharacterGender {
  pub fn parse(s: &str) -> Self {
    match s.trim().to_lowercase().as_str() {
      "female" => Self::Female,
      "male" => Self::Male,
      "genderless" => Self::Genderless,
      _ => Self::Unknown,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Female => "Female",
      Self::Male => "Male",
      Self::Genderless => "Genderless",
      Self::Unknown => "unknown",
    }
  }
}

/// A named reference to another resource (origin or current location)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceRef {
  pub name: String,
  /// None when the API gave no URL for the place
  pub id: Option<i64>,
}

/// Minimal summary of a location, embedded in a character for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPreview {
  pub id: i64,
  pub name: String,
  pub location_type: String,
  pub dimension: String,
}

/// A character, either fully populated or a resident stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
  pub id: i64,
  pub name: String,
  pub character_type: String,
  pub status: CharacterStatus,
  pub species: String,
  pub gender: CharacterGender,
  pub avatar_url: String,
  pub origin: PlaceRef,
  pub location: PlaceRef,
  /// Only attached by a detail fetch
  pub location_preview: Option<LocationPreview>,
}

impl Character {
  /// Placeholder character carrying only its id, used for location residents.
  pub fn stub(id: i64) -> Self {
    Self {
      id,
      name: String::new(),
      character_type: String::new(),
      status: CharacterStatus::Unknown,
      species: String::new(),
      gender: CharacterGender::Unknown,
      avatar_url: String::new(),
      origin: PlaceRef::default(),
      location: PlaceRef::default(),
      location_preview: None,
    }
  }
}

/// Full location details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
  pub id: i64,
  pub name: String,
  pub location_type: String,
  pub dimension: String,
  /// Resident stubs, in API order
  pub residents: Vec<Character>,
}

impl Location {
  pub fn resident_ids(&self) -> Vec<i64> {
    self.residents.iter().map(|c| c.id).collect()
  }

  pub fn preview(&self) -> LocationPreview {
    LocationPreview {
      id: self.id,
      name: self.name.clone(),
      location_type: self.location_type.clone(),
      dimension: self.dimension.clone(),
    }
  }
}
