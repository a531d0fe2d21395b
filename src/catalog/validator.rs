//! # Record Validator
//!
//! Checks a candidate record before it is written. Checks run in a fixed
//! order and the first failure is reported:
//!
//! 1. every required field of the profile is present and non-empty
//! 2. the name is not used by another record (case-insensitive)
//! 3. the types are all known, then unique, then at most two
//!
//! Updates are validated on the merged record, so a partial payload is
//! held to the same rules as a full one.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::{CatalogError, CatalogResult};
use super::record::{Pokemon, PokemonType, SchemaProfile, MAX_TYPES};

/// Fields an update payload may carry
pub const UPDATABLE_FIELDS: [&str; 7] = [
    "name",
    "types",
    "url",
    "height",
    "weight",
    "category",
    "abilities",
];

/// Unvalidated record fields, as received or as merged for an update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PokemonDraft {
    pub name: Option<String>,
    pub types: Option<Vec<String>>,
    pub url: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub category: Option<String>,
    pub abilities: Option<String>,
}

impl PokemonDraft {
    /// Read a create payload. Unknown keys are ignored.
    pub fn from_body(body: &Value) -> CatalogResult<Self> {
        if !body.is_object() {
            return Err(CatalogError::InvalidBody(
                "expected a JSON object".to_string(),
            ));
        }
        serde_json::from_value(body.clone()).map_err(|e| CatalogError::InvalidBody(e.to_string()))
    }

    /// Draft holding a stored record's current values
    pub fn from_record(pokemon: &Pokemon) -> Self {
        Self {
            name: Some(pokemon.name.clone()),
            types: Some(pokemon.types.iter().map(|t| t.to_string()).collect()),
            url: Some(pokemon.url.clone()),
            height: pokemon.height.clone(),
            weight: pokemon.weight.clone(),
            category: pokemon.category.clone(),
            abilities: pokemon.abilities.clone(),
        }
    }

    /// Overlay an update payload on a stored record.
    ///
    /// Every key in `patch` must be in [`UPDATABLE_FIELDS`]. A key that is
    /// present replaces the stored value even when it is null; absent keys
    /// keep the stored value.
    pub fn merge_patch(existing: &Pokemon, patch: &Value) -> CatalogResult<Self> {
        let fields = patch.as_object().ok_or_else(|| {
            CatalogError::InvalidBody("expected a JSON object".to_string())
        })?;
        check_update_fields(fields)?;

        let supplied = Self::from_body(patch)?;
        let mut merged = Self::from_record(existing);

        macro_rules! overlay {
            ($($field:ident),*) => {
                $(
                    if fields.contains_key(stringify!($field)) {
                        merged.$field = supplied.$field;
                    }
                )*
            };
        }
        overlay!(name, types, url, height, weight, category, abilities);

        Ok(merged)
    }

    /// Whether a field counts as present: non-null and non-empty
    pub fn is_present(&self, field: &str) -> bool {
        let text = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        match field {
            "name" => text(&self.name),
            "types" => self.types.as_ref().is_some_and(|t| !t.is_empty()),
            "url" => text(&self.url),
            "height" => text(&self.height),
            "weight" => text(&self.weight),
            "category" => text(&self.category),
            "abilities" => text(&self.abilities),
            _ => false,
        }
    }
}

/// Reject update payloads naming fields outside the allow-list
fn check_update_fields(fields: &Map<String, Value>) -> CatalogResult<()> {
    match fields
        .keys()
        .find(|key| !UPDATABLE_FIELDS.contains(&key.as_str()))
    {
        Some(key) => Err(CatalogError::DisallowedField(key.clone())),
        None => Ok(()),
    }
}

/// A draft that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPokemon {
    pub name: String,
    pub types: Vec<PokemonType>,
    pub url: String,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub category: Option<String>,
    pub abilities: Option<String>,
}

impl ValidPokemon {
    /// Attach an id, producing a storable record
    pub fn into_record(self, id: String) -> Pokemon {
        Pokemon {
            id,
            name: self.name,
            types: self.types,
            url: self.url,
            height: self.height,
            weight: self.weight,
            category: self.category,
            abilities: self.abilities,
        }
    }
}

/// Record validator for one schema profile.
///
/// Validation is deterministic and never mutates the collection.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    profile: SchemaProfile,
}

impl Validator {
    pub fn new(profile: SchemaProfile) -> Self {
        Self { profile }
    }

    /// Validate `draft` against the stored records.
    ///
    /// `exclude_id` names the record being updated, which may keep its
    /// own name.
    pub fn validate(
        &self,
        draft: PokemonDraft,
        existing: &[Pokemon],
        exclude_id: Option<&str>,
    ) -> CatalogResult<ValidPokemon> {
        for field in self.profile.required_fields() {
            if !draft.is_present(field) {
                return Err(CatalogError::MissingField(*field));
            }
        }

        // Presence of name, types and url is guaranteed by every profile.
        let name = draft.name.unwrap_or_default();
        let raw_types = draft.types.unwrap_or_default();
        let url = draft.url.unwrap_or_default();

        check_unique_name(&name, existing, exclude_id)?;
        let types = parse_types(&raw_types)?;

        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
        Ok(ValidPokemon {
            name,
            types,
            url,
            height: non_empty(draft.height),
            weight: non_empty(draft.weight),
            category: non_empty(draft.category),
            abilities: non_empty(draft.abilities),
        })
    }
}

fn check_unique_name(
    name: &str,
    existing: &[Pokemon],
    exclude_id: Option<&str>,
) -> CatalogResult<()> {
    let taken = existing
        .iter()
        .filter(|p| Some(p.id.as_str()) != exclude_id)
        .any(|p| p.has_name(name));

    if taken {
        return Err(CatalogError::DuplicateName(name.to_string()));
    }
    Ok(())
}

/// Enumeration first, then duplicates, then count
fn parse_types(raw: &[String]) -> CatalogResult<Vec<PokemonType>> {
    let parsed = raw
        .iter()
        .map(|s| s.parse::<PokemonType>().map_err(CatalogError::InvalidType))
        .collect::<CatalogResult<Vec<_>>>()?;

    for (i, t) in parsed.iter().enumerate() {
        if parsed[..i].contains(t) {
            return Err(CatalogError::DuplicateType(t.to_string()));
        }
    }

    if parsed.len() > MAX_TYPES {
        return Err(CatalogError::TooManyTypes {
            max: MAX_TYPES,
            got: parsed.len(),
        });
    }

    Ok(parsed)
}
