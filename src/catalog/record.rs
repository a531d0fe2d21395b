//! # Catalog Records
//!
//! The record model: one `Pokemon`, its type enumeration, and the
//! `Collection` persisted as a single document.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{CatalogError, CatalogResult};

/// Maximum number of types a record may carry
pub const MAX_TYPES: usize = 2;

/// The fixed set of Pokemon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PokemonType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl PokemonType {
    pub const ALL: [PokemonType; 18] = [
        PokemonType::Normal,
        PokemonType::Fire,
        PokemonType::Water,
        PokemonType::Electric,
        PokemonType::Grass,
        PokemonType::Ice,
        PokemonType::Fighting,
        PokemonType::Poison,
        PokemonType::Ground,
        PokemonType::Flying,
        PokemonType::Psychic,
        PokemonType::Bug,
        PokemonType::Rock,
        PokemonType::Ghost,
        PokemonType::Dragon,
        PokemonType::Dark,
        PokemonType::Steel,
        PokemonType::Fairy,
    ];

    /// Lower-case canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            PokemonType::Normal => "normal",
            PokemonType::Fire => "fire",
            PokemonType::Water => "water",
            PokemonType::Electric => "electric",
            PokemonType::Grass => "grass",
            PokemonType::Ice => "ice",
            PokemonType::Fighting => "fighting",
            PokemonType::Poison => "poison",
            PokemonType::Ground => "ground",
            PokemonType::Flying => "flying",
            PokemonType::Psychic => "psychic",
            PokemonType::Bug => "bug",
            PokemonType::Rock => "rock",
            PokemonType::Ghost => "ghost",
            PokemonType::Dragon => "dragon",
            PokemonType::Dark => "dark",
            PokemonType::Steel => "steel",
            PokemonType::Fairy => "fairy",
        }
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing ignores case and surrounding whitespace.
impl FromStr for PokemonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        PokemonType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| s.to_string())
    }
}

/// Which fields a record must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaProfile {
    /// name, types, url
    #[default]
    Basic,
    /// basic fields plus height, weight, category, abilities
    Extended,
}

impl SchemaProfile {
    /// Required fields, in the order they are checked
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            SchemaProfile::Basic => &["name", "types", "url"],
            SchemaProfile::Extended => &[
                "name",
                "types",
                "url",
                "height",
                "weight",
                "category",
                "abilities",
            ],
        }
    }

    /// Page size when the request does not give one
    pub fn default_limit(&self) -> usize {
        match self {
            SchemaProfile::Basic => 10,
            SchemaProfile::Extended => 20,
        }
    }
}

/// One catalog entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: String,
    pub name: String,
    pub types: Vec<PokemonType>,
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abilities: Option<String>,
}

impl Pokemon {
    /// Record with only the basic fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        types: Vec<PokemonType>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            types,
            url: url.into(),
            height: None,
            weight: None,
            category: None,
            abilities: None,
        }
    }

    /// Numeric value of the id, if it has one
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// The persisted document: all records plus their count
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub total_pokemons: usize,
    pub pokemons: Vec<Pokemon>,
}

impl Collection {
    /// Build a collection with a consistent counter
    pub fn new(pokemons: Vec<Pokemon>) -> Self {
        Self {
            total_pokemons: pokemons.len(),
            pokemons,
        }
    }

    pub fn len(&self) -> usize {
        self.pokemons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemons.is_empty()
    }

    /// Position of the record with this exact id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.pokemons.iter().position(|p| p.id == id)
    }

    /// Next id: one past the largest numeric id anywhere in the collection.
    ///
    /// Fails once the largest id is `u64::MAX`; ids are never reused.
    pub fn next_id(&self) -> CatalogResult<String> {
        let max = self
            .pokemons
            .iter()
            .filter_map(Pokemon::numeric_id)
            .max()
            .unwrap_or(0);
        max.checked_add(1)
            .map(|id| id.to_string())
            .ok_or_else(|| CatalogError::store(format!("no id left after {}", max)))
    }

    /// Re-derive the counter from the sequence length
    pub fn recount(&mut self) {
        self.total_pokemons = self.pokemons.len();
    }

    /// Whether the stored counter agrees with the sequence
    pub fn is_consistent(&self) -> bool {
        self.total_pokemons == self.pokemons.len()
    }
}
