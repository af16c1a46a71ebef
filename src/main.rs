use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

use rickdex::api::RickApiClient;
use rickdex::cache::SqliteStorage;
use rickdex::config::Config;
use rickdex::logging;
use rickdex::models::Character;
use rickdex::repository::{
  character_cursor, CachedCharacterRepository, CachedLocationRepository, CharacterRepository,
  LocationRepository,
};

#[derive(Parser, Debug)]
#[command(name = "rickdex")]
#[command(about = "Browse Rick and Morty characters and locations, cached locally")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/rickdex/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Override the cache database location
  #[arg(long)]
  cache: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List cached characters, loading the first page if the cache is empty
  Characters,
  /// Load the next page(s) of characters into the cache
  More {
    /// How many pages to load
    #[arg(short = 'n', long, default_value_t = 1)]
    pages: u32,
  },
  /// Show one character with its current location
  Character { id: i64 },
  /// Show a location and its residents
  Location { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = Config::load(args.config.as_deref())?;
  if let Some(path) = args.cache {
    config.cache.path = Some(path);
  }

  let _log_guard = logging::init(&config.log)?;

  let storage = Arc::new(SqliteStorage::open(config.cache.path.as_deref())?);
  let client = RickApiClient::new(&config.api)?;

  let locations = Arc::new(CachedLocationRepository::new(
    client.clone(),
    Arc::clone(&storage),
  ));
  let characters = CachedCharacterRepository::new(
    client,
    Arc::clone(&storage),
    character_cursor(Arc::clone(&storage)),
    Arc::clone(&locations),
  )?;

  match args.command {
    Command::Characters => {
      let mut feed = characters.get_characters().await?;
      for character in feed.snapshot() {
        print_summary(&character);
      }
    }
    Command::More { pages } => {
      for _ in 0..pages {
        let cursor = characters.load_more().await?;
        println!("next: {}", cursor);
        if cursor.is_exhausted() {
          break;
        }
      }
    }
    Command::Character { id } => {
      let character = characters.get_character(id).await?;
      print_summary(&character);
      println!("  avatar:   {}", character.avatar_url);
      println!("  origin:   {}", character.origin.name);
      if let Some(preview) = character.location_preview {
        println!(
          "  location: {} ({}, {}) [#{}]",
          preview.name, preview.location_type, preview.dimension, preview.id
        );
      }
    }
    Command::Location { id } => {
      let location = locations.get_location(id).await?;
      println!("{} [#{}]", location.name, location.id);
      println!("  type:      {}", location.location_type);
      println!("  dimension: {}", location.dimension);
      println!("  residents:");

      let residents = characters
        .get_characters_by_ids(&location.resident_ids())
        .await?;
      for character in residents {
        print!("    ");
        print_summary(&character);
      }
    }
  }

  Ok(())
}

fn print_summary(character: &Character) {
  println!(
    "#{:<4} {} - {} {} ({})",
    character.id,
    character.name,
    character.status.as_str(),
    character.species,
    character.gender.as_str()
  );
}
