//! # Seed Loader
//!
//! Builds the initial collection from a CSV export. Only rows whose image
//! exists are kept; ids follow the order of the kept rows. Seeded records
//! obey the same name and type rules as created ones: a repeated name is
//! skipped and a repeated type is dropped.
//!
//! Expected headers: `Name`, `Type1`, `Type2`, and optionally `Height`,
//! `Weight`, `Category`, `Abilities`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use super::errors::{CatalogError, CatalogResult};
use super::record::{Collection, Pokemon, PokemonType};

/// Decides whether a record has an image
pub trait ImageCheck {
    fn has_image(&self, name: &str) -> bool;
}

/// Images stored as `<dir>/<name>.png`
#[derive(Debug, Clone)]
pub struct ImageDirectory {
    dir: PathBuf,
}

impl ImageDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn image_path(&self, name: &str) -> PathBuf {
        self.dir.join(image_file_name(name))
    }
}

impl ImageCheck for ImageDirectory {
    fn has_image(&self, name: &str) -> bool {
        self.image_path(name).is_file()
    }
}

fn image_file_name(name: &str) -> String {
    format!("{}.png", name)
}

/// One CSV row
#[derive(Debug, Clone, Deserialize)]
struct SeedRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type1")]
    type1: String,
    #[serde(rename = "Type2", default)]
    type2: Option<String>,
    #[serde(rename = "Height", default)]
    height: Option<String>,
    #[serde(rename = "Weight", default)]
    weight: Option<String>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
    #[serde(rename = "Abilities", default)]
    abilities: Option<String>,
}

/// CSV-to-collection loader
pub struct SeedLoader<I: ImageCheck> {
    images: I,
    image_base_url: String,
}

impl<I: ImageCheck> SeedLoader<I> {
    pub fn new(images: I, image_base_url: impl Into<String>) -> Self {
        Self {
            images,
            image_base_url: image_base_url.into(),
        }
    }

    /// Load from a CSV file
    pub fn load_path(&self, csv_path: &Path) -> CatalogResult<Collection> {
        let reader = csv::Reader::from_path(csv_path).map_err(|e| {
            CatalogError::store(format!("failed to open {}: {}", csv_path.display(), e))
        })?;
        self.load(reader)
    }

    /// Load from any CSV source
    pub fn load<R: std::io::Read>(&self, mut reader: csv::Reader<R>) -> CatalogResult<Collection> {
        let mut pokemons: Vec<Pokemon> = Vec::new();
        let mut seen_names = HashSet::new();
        let mut skipped_images = 0usize;

        for row in reader.deserialize::<SeedRow>() {
            let row = row.map_err(|e| CatalogError::store(format!("invalid CSV row: {}", e)))?;

            if !self.images.has_image(&row.name) {
                skipped_images += 1;
                continue;
            }

            if seen_names.contains(&row.name.to_lowercase()) {
                warn!(name = %row.name, "skipping row with repeated name");
                continue;
            }

            match self.to_record(row, pokemons.len() + 1) {
                Ok(pokemon) => {
                    seen_names.insert(pokemon.name.to_lowercase());
                    pokemons.push(pokemon);
                }
                Err(name) => warn!(name = %name, "skipping row without a known type"),
            }
        }

        info!(
            loaded = pokemons.len(),
            without_image = skipped_images,
            "seed data loaded"
        );
        Ok(Collection::new(pokemons))
    }

    /// Err carries the row name when the types are missing or unknown
    fn to_record(&self, row: SeedRow, id: usize) -> Result<Pokemon, String> {
        let mut types = [Some(row.type1), row.type2]
            .into_iter()
            .flatten()
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.parse::<PokemonType>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| row.name.clone())?;
        if types.len() == 2 && types[0] == types[1] {
            warn!(name = %row.name, "dropping repeated type");
            types.truncate(1);
        }
        if types.is_empty() {
            return Err(row.name);
        }

        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        let url = format!(
            "{}/{}",
            self.image_base_url.trim_end_matches('/'),
            image_file_name(&row.name)
        );

        Ok(Pokemon {
            id: id.to_string(),
            url,
            types,
            height: non_empty(row.height),
            weight: non_empty(row.weight),
            category: non_empty(row.category),
            abilities: non_empty(row.abilities),
            name: row.name,
        })
    }
}
